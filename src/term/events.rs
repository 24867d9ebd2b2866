//! Terminal event listener: resizes and stop requests.
//!
//! A dedicated thread blocks on the crossterm event stream.  Resizes are
//! applied to the display buffer directly (its internal lock serializes them
//! against the animation); stop keys only raise the stop flag, which the
//! engine observes at the next cycle boundary.  The thread is detached: it
//! either exits with the stop request it raised or dies with the process.

use std::io;
use std::sync::Arc;
use std::thread;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{Clear, ClearType},
};

use crate::pulse::{DisplayBuffer, StopHandle};

/// Spawn the listener thread.
pub fn spawn_listener(buffer: Arc<DisplayBuffer>, stop: StopHandle) -> thread::JoinHandle<()> {
    thread::spawn(move || listen(&buffer, &stop))
}

fn listen(buffer: &DisplayBuffer, stop: &StopHandle) {
    loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            // A dead event stream means no more stop keys can ever arrive;
            // request shutdown rather than animate unstoppably.
            Err(_) => {
                stop.request();
                return;
            }
        };

        match ev {
            Event::Resize(width, _) => {
                // Stale cells outside the new geometry would linger, so wipe
                // the screen before the next frame repaints it.
                let _ = execute!(
                    io::stdout(),
                    Clear(ClearType::All),
                    cursor::MoveTo(0, 0)
                );
                buffer.resize(width as usize);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    stop.request();
                    return;
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    stop.request();
                    return;
                }
                _ => {}
            },
            _ => {}
        }
    }
}
