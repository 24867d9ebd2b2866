// cardiotty: a CPU-driven heartbeat cardiogram for your terminal

use std::process;

use crossterm::terminal;

use cardiotty::pulse::Pulsar;
use cardiotty::stat::ProcStatSampler;
use cardiotty::term::{events, TerminalSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sampler = match ProcStatSampler::new() {
        Ok(sampler) => sampler,
        Err(err) => {
            eprintln!("failed to init cpu sampler: {}", err);
            process::exit(1);
        }
    };

    // The sink owns terminal state: raw mode on, cursor hidden.  Dropping
    // the engine drops the sink and restores both, on every exit path.
    let sink = TerminalSink::new()?;
    let mut pulsar = Pulsar::new(sampler, sink);

    // Fit the buffer to the terminal before the first frame; later resizes
    // arrive through the event listener.
    if let Ok((width, _)) = terminal::size() {
        pulsar.buffer().resize(width as usize);
    }

    // Detached: the listener either raises the stop flag or dies with the
    // process.
    let _listener = events::spawn_listener(pulsar.buffer(), pulsar.stop_handle());

    let result = pulsar.run();
    drop(pulsar);

    if let Err(err) = result {
        eprintln!("pulse error: {}", err);
        process::exit(1);
    }

    Ok(())
}
