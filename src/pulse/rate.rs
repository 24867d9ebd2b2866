//! CPU usage → heart rate → color tier / inter-beat spacing.
//!
//! The mapping is a straight line from [`MIN_BPM`] at 0% to [`MAX_BPM`] at
//! 100%, with a couple of BPM of random jitter on top.  The jitter is
//! deliberate: a perfectly smooth rate reads as mechanical, and a heart is
//! not.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::term::Tint;

use super::{BEAT_WIDTH, CRITICAL_BPM, HIGH_BPM, MAX_BPM, MIN_BPM, SYMBOLS_PER_SEC};

/// Jitter half-width in BPM: draws land in `[-2, +2]`.
const JITTER_BPM: i64 = 2;

/// Maps CPU usage percentages to jittered BPM values.
pub struct RateMapper {
    rng: Lcg,
}

impl RateMapper {
    /// A mapper seeded from the system clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e3779b97f4a7c15);
        RateMapper { rng: Lcg::new(seed) }
    }

    /// A deterministically seeded mapper, for tests.
    pub fn with_seed(seed: u64) -> Self {
        RateMapper { rng: Lcg::new(seed) }
    }

    /// Heart rate for a CPU usage percentage.
    ///
    /// Linear in usage, plus a jitter draw, clamped to
    /// `[MIN_BPM, MAX_BPM]` regardless of input or jitter.
    pub fn bpm(&mut self, cpu_pct: f64) -> u32 {
        let cpu = cpu_pct.clamp(0.0, 100.0);
        let ratio = f64::from(MAX_BPM - MIN_BPM) / 100.0;
        let base = (ratio * cpu) as i64 + i64::from(MIN_BPM);
        let jitter = self.rng.next_range(0, 2 * JITTER_BPM as u64 + 1) as i64 - JITTER_BPM;

        (base + jitter).clamp(i64::from(MIN_BPM), i64::from(MAX_BPM)) as u32
    }
}

impl Default for RateMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Color tier for a heart rate.
///
/// Both thresholds are exclusive: exactly [`HIGH_BPM`] is still normal and
/// exactly [`CRITICAL_BPM`] is still elevated.
pub fn tint_for(bpm: u32) -> Tint {
    if bpm > CRITICAL_BPM {
        Tint::Critical
    } else if bpm > HIGH_BPM {
        Tint::Elevated
    } else {
        Tint::Normal
    }
}

/// Number of flat-line columns between beats so the overall beat frequency
/// matches `bpm` at the fixed scroll speed.
///
/// Very high rates would ask for a negative run; those collapse to zero and
/// the beats simply run back to back, never truncating the glyph.
pub fn flat_run_columns(bpm: u32) -> usize {
    if bpm == 0 {
        return 0;
    }
    let bps = f64::from(bpm) / 60.0;
    let cycle_columns = (SYMBOLS_PER_SEC as f64 / bps) as i64;

    (cycle_columns - BEAT_WIDTH as i64).max(0) as usize
}

/// Simple LCG PRNG; parameters from Numerical Recipes.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform draw in `[min, max)`.
    fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.next_u64() % (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_within_bounds_for_any_input() {
        let mut mapper = RateMapper::with_seed(7);
        for cpu in [-10.0, 0.0, 0.1, 33.3, 50.0, 99.9, 100.0, 250.0, f64::NAN] {
            for _ in 0..64 {
                let bpm = mapper.bpm(cpu);
                assert!((MIN_BPM..=MAX_BPM).contains(&bpm), "bpm {} for cpu {}", bpm, cpu);
            }
        }
    }

    #[test]
    fn test_bpm_tracks_usage() {
        // Averaged over many draws the jitter cancels, so the mean at 100%
        // must sit well above the mean at 0%.
        let mut mapper = RateMapper::with_seed(42);
        let mean = |mapper: &mut RateMapper, cpu: f64| -> f64 {
            (0..256).map(|_| f64::from(mapper.bpm(cpu))).sum::<f64>() / 256.0
        };

        let idle = mean(&mut mapper, 0.0);
        let busy = mean(&mut mapper, 100.0);

        assert!(idle < f64::from(MIN_BPM) + 5.0);
        assert!(busy > f64::from(MAX_BPM) - 5.0);
        assert!(busy > idle);
    }

    #[test]
    fn test_tint_boundaries() {
        assert_eq!(tint_for(HIGH_BPM), Tint::Normal);
        assert_eq!(tint_for(HIGH_BPM + 1), Tint::Elevated);
        assert_eq!(tint_for(CRITICAL_BPM), Tint::Elevated);
        assert_eq!(tint_for(CRITICAL_BPM + 1), Tint::Critical);
    }

    #[test]
    fn test_flat_run_shrinks_with_rate() {
        let slow = flat_run_columns(MIN_BPM);
        let fast = flat_run_columns(MAX_BPM);

        assert!(slow > fast);
        // At the maximum rate exactly one spacer column remains.
        assert_eq!(fast, 1);
    }

    #[test]
    fn test_flat_run_never_negative() {
        // Rates beyond MAX_BPM cannot occur, but the floor still holds.
        assert_eq!(flat_run_columns(10_000), 0);
        assert_eq!(flat_run_columns(0), 0);
    }
}
