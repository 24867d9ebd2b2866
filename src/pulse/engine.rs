//! The animation engine.
//!
//! [`Pulsar`] runs the main loop: sample CPU, map usage to a heart rate,
//! play one cardiac cycle (the beat glyph followed by a rate-dependent flat
//! run), repeat.  A stop request is observed once per cycle, at the cycle
//! boundary, so an in-flight beat always finishes before the shutdown
//! flatline plays.  Shutdown latency is therefore bounded by one cycle, by
//! far the simplest contract that never tears a glyph.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::stat::{CpuSampler, StatError};
use crate::term::{DisplaySink, Tint};

use super::rate::{flat_run_columns, tint_for};
use super::waveform::{self, BASELINE_HIGH, BASELINE_LOW};
use super::{DisplayBuffer, RateMapper, BEAT_WIDTH, DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_MS,
    SYMBOLS_PER_SEC};

/// Errors that end the animation.
#[derive(Debug)]
pub enum PulseError {
    /// CPU sampling failed; fatal, the loop does not retry.
    Sampling(StatError),

    /// Writing to the display sink failed.
    Render(io::Error),
}

impl fmt::Display for PulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulseError::Sampling(err) => write!(f, "sampling failed: {}", err),
            PulseError::Render(err) => write!(f, "render failed: {}", err),
        }
    }
}

impl std::error::Error for PulseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PulseError::Sampling(err) => Some(err),
            PulseError::Render(err) => Some(err),
        }
    }
}

impl From<StatError> for PulseError {
    fn from(err: StatError) -> Self {
        PulseError::Sampling(err)
    }
}

impl From<io::Error> for PulseError {
    fn from(err: io::Error) -> Self {
        PulseError::Render(err)
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Looping cardiac cycles.
    Running,
    /// Stop observed; the shutdown flatline is playing.
    ShuttingDown,
    /// Terminal state; the loop has returned.
    Stopped,
}

/// Clonable one-shot stop request.  Requesting twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        StopHandle(Arc::new(AtomicBool::new(false)))
    }

    /// Ask the engine to shut down at the next cycle boundary.
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The animation engine.
pub struct Pulsar<S: CpuSampler, D: DisplaySink> {
    sampler: S,
    sink: D,
    buf: Arc<DisplayBuffer>,
    rate: RateMapper,
    stop: StopHandle,
    state: EngineState,
    frame_delay: Duration,
}

impl<S: CpuSampler, D: DisplaySink> Pulsar<S, D> {
    /// Create an engine over a default-sized buffer.
    pub fn new(sampler: S, sink: D) -> Self {
        Pulsar {
            sampler,
            sink,
            buf: Arc::new(DisplayBuffer::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)),
            rate: RateMapper::new(),
            stop: StopHandle::new(),
            state: EngineState::Running,
            frame_delay: Duration::from_millis(FRAME_MS),
        }
    }

    /// Override the per-column frame delay; tests pass zero.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Replace the rate mapper, e.g. with a seeded one.
    pub fn with_rate(mut self, rate: RateMapper) -> Self {
        self.rate = rate;
        self
    }

    /// Shared handle to the display buffer, for the resize listener.
    pub fn buffer(&self) -> Arc<DisplayBuffer> {
        Arc::clone(&self.buf)
    }

    /// Handle for requesting shutdown from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Consume the engine and return its sink; tests inspect recorded frames
    /// through this.
    pub fn into_sink(self) -> D {
        self.sink
    }

    /// Run the animation until a stop request or a fatal error.
    ///
    /// A sampling or render failure aborts immediately, skipping the
    /// shutdown flatline; terminal restoration is the sink's concern and
    /// happens regardless.
    pub fn run(&mut self) -> Result<(), PulseError> {
        // First poll only establishes the counter baseline; give it one
        // frame of elapsed time before the reading that drives the display.
        self.sampler.poll()?;
        thread::sleep(self.frame_delay);

        while self.state == EngineState::Running {
            if self.stop.is_requested() {
                self.state = EngineState::ShuttingDown;
                break;
            }

            let cpu = self.sampler.poll()?;
            let bpm = self.rate.bpm(cpu);

            self.cardiac_cycle(cpu, bpm)?;
        }

        if self.state == EngineState::ShuttingDown {
            self.flatline()?;
        }

        self.state = EngineState::Stopped;
        Ok(())
    }

    /// Play one beat glyph plus the flat run that pads the cycle out to the
    /// requested rate.
    fn cardiac_cycle(&mut self, cpu: f64, bpm: u32) -> Result<(), PulseError> {
        let height = self.buf.height();
        let columns = BEAT_WIDTH + flat_run_columns(bpm);

        for step in 0..columns {
            self.buf.shift();

            if step < BEAT_WIDTH {
                for row in 0..height {
                    self.buf.set_rune(row, waveform::glyph_at(row, step));
                }
            } else if (step - BEAT_WIDTH) % 2 == 0 {
                self.buf.set_rune(height / 2, BASELINE_LOW);
            } else {
                self.buf.set_rune(height / 2 + 1, BASELINE_HIGH);
            }

            self.render_frame(cpu, bpm)?;
            thread::sleep(self.frame_delay);
        }

        Ok(())
    }

    /// One frame: the colored cardiogram plus the status line underneath.
    fn render_frame(&mut self, cpu: f64, bpm: u32) -> io::Result<()> {
        let tint = tint_for(bpm);

        self.buf.render_beat_colored(&mut self.sink, tint)?;

        self.sink.clear_line()?;
        self.sink.write_text(&format!("cpu: {:.1}%   ", cpu))?;
        self.sink.write_text("bpm: ")?;
        self.sink.write_tinted(&bpm.to_string(), tint)?;
        self.sink.move_home()?;
        self.sink.flush()
    }

    /// The shutdown animation: one second of flat baseline in the default
    /// color, then silence.
    fn flatline(&mut self) -> Result<(), PulseError> {
        self.sink.clear_screen()?;
        self.sink.move_home()?;

        let center = self.buf.height() / 2;
        for _ in 0..SYMBOLS_PER_SEC {
            self.buf.shift();
            self.buf.set_rune(center, BASELINE_LOW);
            self.buf.render_all_colored(&mut self.sink, Tint::Plain)?;
            self.sink.flush()?;

            thread::sleep(self.frame_delay);
        }

        Ok(())
    }
}
