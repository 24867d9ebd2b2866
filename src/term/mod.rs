//! Terminal layer built on [crossterm](https://docs.rs/crossterm).
//!
//! Two concerns live here:
//!
//! - **[`sink`]** — the [`DisplaySink`] abstraction the buffer renders
//!   through: cursor homing, line clearing, and line output with an optional
//!   trailing colored span.  [`TerminalSink`] is the real stdout-backed
//!   implementation; [`RecordingSink`] captures sink calls for tests.
//! - **[`events`]** — a listener thread on the crossterm event stream that
//!   forwards terminal resizes to the display buffer and turns Ctrl+C / `q`
//!   into a stop request.
//!
//! [`TerminalSink`] owns terminal state: constructing it enables raw mode
//! and hides the cursor, dropping it restores both.  The restore runs on
//! every exit path, including error returns and panics.

pub mod events;
pub mod sink;

pub use sink::{DisplaySink, RecordingSink, SinkOp, TerminalSink, Tint};
