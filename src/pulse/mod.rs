//! The animation core: scrolling display buffer, heartbeat glyph, rate
//! mapping, and the timing engine.
//!
//! The module is organized into four pieces:
//!
//! - **[`buffer`]** — the scrolling character grid the cardiogram is drawn
//!   into, safe against terminal resizes arriving from another thread
//! - **[`waveform`]** — the fixed heartbeat glyph and flat-line characters
//! - **[`rate`]** — CPU usage → BPM → color tier / inter-beat spacing
//! - **[`engine`]** — the [`Pulsar`] loop that paces the animation column by
//!   column and plays the shutdown flatline
//!
//! Timing is derived from the constants below: at the maximum heart rate the
//! display must scroll one full glyph plus one spacer column per beat, which
//! fixes the per-column frame delay for every rate.

pub mod buffer;
pub mod engine;
pub mod rate;
pub mod waveform;

pub use buffer::DisplayBuffer;
pub use engine::{EngineState, PulseError, Pulsar, StopHandle};
pub use rate::RateMapper;

/// Slowest displayed heart rate, used at 0% CPU.
pub const MIN_BPM: u32 = 55;

/// Fastest displayed heart rate, used at 100% CPU.
pub const MAX_BPM: u32 = 180;

/// Rates above this are rendered in the elevated (yellow) tier.
pub const HIGH_BPM: u32 = 120;

/// Rates above this are rendered in the critical (red) tier.
pub const CRITICAL_BPM: u32 = 150;

/// Buffer width before the first terminal size query succeeds.
pub const DEFAULT_WIDTH: usize = 60;

/// Fixed cardiogram height in rows; matches the glyph height.
pub const DEFAULT_HEIGHT: usize = 7;

/// Width of one heartbeat glyph in columns.
pub const BEAT_WIDTH: usize = 13;

/// Columns drawn per second.  At MAX_BPM a beat occupies the glyph plus a
/// single spacer column, which pins the scroll speed for every lower rate.
pub const SYMBOLS_PER_SEC: usize = (MAX_BPM as usize / 60) * (BEAT_WIDTH + 1);

/// Per-column frame delay in milliseconds.
pub const FRAME_MS: u64 = 1000 / SYMBOLS_PER_SEC as u64;
