//! CPU usage sampling from `/proc/stat`.
//!
//! The aggregate `cpu` row of `/proc/stat` holds cumulative tick counters.
//! Usage over an interval is derived from two successive snapshots:
//! `100 * (1 - Δidle / Δtotal)`.  [`ProcStatSampler`] keeps the previous and
//! current snapshot pair; the first read after construction only establishes
//! the baseline, so the sampler primes itself in [`ProcStatSampler::new`].

use std::fmt;
use std::fs;
use std::io;

const PROC_STAT_PATH: &str = "/proc/stat";

/// Position of the idle counter within the `cpu` row.
const IDLE_FIELD: usize = 3;

/// Errors from the CPU sampling layer.  All of them are fatal to the
/// animation: the engine stops and surfaces the error, it never retries.
#[derive(Debug)]
pub enum StatError {
    /// The counter source could not be opened or read.
    Open { path: &'static str, source: io::Error },

    /// The counter source had no aggregate `cpu` row.
    MissingCpuRow,

    /// The `cpu` row carried no counter fields at all.
    Malformed,
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatError::Open { path, source } => {
                write!(f, "cpu sampler: failed to read {}: {}", path, source)
            }
            StatError::MissingCpuRow => {
                write!(f, "cpu sampler: no aggregate cpu row found")
            }
            StatError::Malformed => {
                write!(f, "cpu sampler: cpu row carried no counters")
            }
        }
    }
}

impl std::error::Error for StatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatError::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Anything that can be polled for a CPU usage percentage.
///
/// Implementations keep whatever counter state they need across calls.  The
/// returned value is always finite and within `[0, 100]`.
pub trait CpuSampler {
    fn poll(&mut self) -> Result<f64, StatError>;
}

/// Samples aggregate CPU usage from `/proc/stat`.
pub struct ProcStatSampler {
    idle: [u64; 2],
    total: [u64; 2],
}

impl ProcStatSampler {
    /// Create a sampler and prime it with a baseline reading.
    pub fn new() -> Result<Self, StatError> {
        let mut sampler = ProcStatSampler {
            idle: [0; 2],
            total: [0; 2],
        };
        sampler.read_counters()?;
        Ok(sampler)
    }

    /// Read the current counters, pushing the previous reading back one slot.
    fn read_counters(&mut self) -> Result<(), StatError> {
        let content = fs::read_to_string(PROC_STAT_PATH).map_err(|source| StatError::Open {
            path: PROC_STAT_PATH,
            source,
        })?;

        let row = content
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or(StatError::MissingCpuRow)?;

        let (total, idle) = parse_cpu_row(row)?;

        self.idle[0] = self.idle[1];
        self.total[0] = self.total[1];
        self.idle[1] = idle;
        self.total[1] = total;

        Ok(())
    }

    /// Usage over the last snapshot interval, clamped to `[0, 100]`.
    ///
    /// Counters that went backwards or an empty interval would produce a
    /// negative or undefined ratio; both clamp to 0 instead.
    fn usage(&self) -> f64 {
        if self.total[1] <= self.total[0] {
            return 0.0;
        }

        let idle_ticks = self.idle[1].saturating_sub(self.idle[0]) as f64;
        let total_ticks = (self.total[1] - self.total[0]) as f64;

        (100.0 * (1.0 - idle_ticks / total_ticks)).clamp(0.0, 100.0)
    }
}

impl CpuSampler for ProcStatSampler {
    fn poll(&mut self) -> Result<f64, StatError> {
        self.read_counters()?;
        Ok(self.usage())
    }
}

/// Sum all tick counters of a `cpu` row and pick out the idle field.
///
/// Individual fields that fail to parse count as zero ticks; only a row with
/// no fields at all is an error.
fn parse_cpu_row(row: &str) -> Result<(u64, u64), StatError> {
    let fields: Vec<u64> = row
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse::<u64>().unwrap_or(0))
        .collect();

    if fields.is_empty() {
        return Err(StatError::Malformed);
    }

    let total = fields.iter().sum();
    let idle = fields.get(IDLE_FIELD).copied().unwrap_or(0);

    Ok((total, idle))
}
