// Integration tests for the animation engine

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cardiotty::pulse::rate::flat_run_columns;
use cardiotty::pulse::{
    EngineState, PulseError, Pulsar, RateMapper, StopHandle, BEAT_WIDTH, DEFAULT_HEIGHT,
    SYMBOLS_PER_SEC,
};
use cardiotty::stat::{CpuSampler, StatError};
use cardiotty::term::{RecordingSink, SinkOp, Tint};

/// Reports a fixed usage and raises the stop flag on a chosen poll, which
/// simulates a stop request arriving while a cycle is in flight.
struct ScriptedSampler {
    usage: f64,
    polls: usize,
    stop_on_poll: usize,
    stop: Arc<OnceLock<StopHandle>>,
}

impl ScriptedSampler {
    fn new(usage: f64, stop_on_poll: usize) -> (Self, Arc<OnceLock<StopHandle>>) {
        let slot = Arc::new(OnceLock::new());
        let sampler = ScriptedSampler {
            usage,
            polls: 0,
            stop_on_poll,
            stop: Arc::clone(&slot),
        };
        (sampler, slot)
    }
}

impl CpuSampler for ScriptedSampler {
    fn poll(&mut self) -> Result<f64, StatError> {
        self.polls += 1;
        if self.polls >= self.stop_on_poll {
            if let Some(stop) = self.stop.get() {
                stop.request();
            }
        }
        Ok(self.usage)
    }
}

/// Fails on the poll after the baseline.
struct FailingSampler {
    polls: usize,
}

impl CpuSampler for FailingSampler {
    fn poll(&mut self) -> Result<f64, StatError> {
        self.polls += 1;
        if self.polls > 1 {
            Err(StatError::MissingCpuRow)
        } else {
            Ok(0.0)
        }
    }
}

#[test]
fn test_stop_before_first_cycle_plays_only_the_flatline() {
    // Stop raised by the baseline poll: no cardiac cycle runs at all.
    let (sampler, slot) = ScriptedSampler::new(50.0, 1);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO);
    slot.set(pulsar.stop_handle()).unwrap();

    pulsar.run().unwrap();

    assert_eq!(pulsar.state(), EngineState::Stopped);
    let sink = pulsar.into_sink();
    assert_eq!(sink.line_count(Tint::Plain), SYMBOLS_PER_SEC * DEFAULT_HEIGHT);
    assert_eq!(
        sink.lines().len(),
        SYMBOLS_PER_SEC * DEFAULT_HEIGHT,
        "no colored cycle frames expected"
    );
    assert!(sink.ops.contains(&SinkOp::ClearScreen));
}

#[test]
fn test_stop_mid_cycle_completes_the_cycle_before_fading() {
    // The poll that drives the first cycle raises the stop flag, so the
    // request is pending for the whole cycle.
    let (sampler, slot) = ScriptedSampler::new(100.0, 2);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO)
        .with_rate(RateMapper::with_seed(1));
    slot.set(pulsar.stop_handle()).unwrap();

    pulsar.run().unwrap();
    assert_eq!(pulsar.state(), EngineState::Stopped);

    // Same seed, same draw sequence: recompute the cycle length.
    let bpm = RateMapper::with_seed(1).bpm(100.0);
    let cycle_columns = BEAT_WIDTH + flat_run_columns(bpm);

    let sink = pulsar.into_sink();
    let colored = sink
        .lines()
        .iter()
        .filter(|(_, tint)| *tint != Tint::Plain)
        .count();

    // The full glyph rendered despite the pending stop, then the fade-out.
    assert_eq!(colored, cycle_columns * DEFAULT_HEIGHT);
    assert_eq!(sink.line_count(Tint::Plain), SYMBOLS_PER_SEC * DEFAULT_HEIGHT);
}

#[test]
fn test_full_load_renders_critical() {
    let (sampler, slot) = ScriptedSampler::new(100.0, 2);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO)
        .with_rate(RateMapper::with_seed(9));
    slot.set(pulsar.stop_handle()).unwrap();

    pulsar.run().unwrap();

    let sink = pulsar.into_sink();
    assert!(sink.line_count(Tint::Critical) > 0);
    assert_eq!(sink.line_count(Tint::Normal), 0);
    assert_eq!(sink.line_count(Tint::Elevated), 0);

    // The status line carries the tinted bpm value.
    assert!(sink
        .ops
        .iter()
        .any(|op| matches!(op, SinkOp::Tinted(text, Tint::Critical)
            if text.parse::<u32>().is_ok())));
}

#[test]
fn test_idle_load_renders_normal_with_flat_baseline() {
    let (sampler, slot) = ScriptedSampler::new(0.0, 2);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO)
        .with_rate(RateMapper::with_seed(3));
    slot.set(pulsar.stop_handle()).unwrap();

    pulsar.run().unwrap();

    let sink = pulsar.into_sink();
    assert!(sink.line_count(Tint::Normal) > 0);
    assert_eq!(sink.line_count(Tint::Elevated), 0);
    assert_eq!(sink.line_count(Tint::Critical), 0);

    // At 55ish BPM the flat run is long; both baseline glyphs must appear.
    let all_text: String = sink
        .lines()
        .iter()
        .map(|(text, _)| text.as_str())
        .collect();
    assert!(all_text.contains('_'));
    assert!(all_text.contains('‾'));
}

#[test]
fn test_sampling_failure_aborts_without_fadeout() {
    let mut pulsar = Pulsar::new(FailingSampler { polls: 0 }, RecordingSink::new())
        .with_frame_delay(Duration::ZERO);

    let result = pulsar.run();

    assert!(matches!(
        result,
        Err(PulseError::Sampling(StatError::MissingCpuRow))
    ));
    let sink = pulsar.into_sink();
    assert_eq!(sink.line_count(Tint::Plain), 0, "no fade-out after a fatal error");
    assert!(!sink.ops.contains(&SinkOp::ClearScreen));
}

#[test]
fn test_stop_is_idempotent() {
    let (sampler, slot) = ScriptedSampler::new(50.0, 1);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO);
    slot.set(pulsar.stop_handle()).unwrap();

    let stop = pulsar.stop_handle();
    stop.request();
    stop.request();
    assert!(stop.is_requested());

    pulsar.run().unwrap();
    assert_eq!(pulsar.state(), EngineState::Stopped);
}

#[test]
fn test_resize_during_run_is_absorbed_by_the_buffer() {
    let (sampler, slot) = ScriptedSampler::new(50.0, 2);
    let mut pulsar = Pulsar::new(sampler, RecordingSink::new())
        .with_frame_delay(Duration::ZERO);
    slot.set(pulsar.stop_handle()).unwrap();

    let buffer = pulsar.buffer();
    buffer.resize(25);
    assert_eq!(buffer.width(), 25);

    pulsar.run().unwrap();

    // Every frame rendered at the resized width.
    let sink = pulsar.into_sink();
    assert!(sink
        .lines()
        .iter()
        .all(|(text, _)| text.chars().count() == 25));
}
