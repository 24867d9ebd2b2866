//! # Introduction
//!
//! cardiotty draws a live, scrolling ASCII cardiogram in the terminal.  The
//! beat rate and color of the waveform follow current CPU utilization: an
//! idle machine rests near 55 BPM in green, a saturated one races toward
//! 180 BPM in red.
//!
//! ## Animation pipeline
//!
//! ```text
//! /proc/stat → CpuSampler → RateMapper → Pulsar → DisplayBuffer → DisplaySink
//! ```
//!
//! 1. [`stat`] — samples aggregate CPU usage from `/proc/stat`, converting
//!    successive counter snapshots into a percentage.
//! 2. [`pulse`] — the core: the scrolling [`pulse::DisplayBuffer`], the
//!    heartbeat glyph table, CPU-to-BPM mapping, and the [`pulse::Pulsar`]
//!    animation engine that paces the whole thing column by column.
//! 3. [`term`] — the crossterm-backed display sink, plus the event listener
//!    that feeds terminal resizes and stop requests back into the engine.
//!
//! The binary entry point wires these together; the library API exists so
//! integration tests can drive the engine against a recording sink.

pub mod pulse;
pub mod stat;
pub mod term;
