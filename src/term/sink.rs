//! The display sink: where rendered cardiogram lines go.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

/// Severity color of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// Resting rate: green.
    Normal,
    /// Elevated rate: yellow.
    Elevated,
    /// Critical rate: red.
    Critical,
    /// Default terminal color; used for the shutdown flatline.
    Plain,
}

impl Tint {
    fn color(self) -> Color {
        match self {
            Tint::Normal => Color::Green,
            Tint::Elevated => Color::Yellow,
            Tint::Critical => Color::Red,
            Tint::Plain => Color::Reset,
        }
    }
}

/// Abstract terminal output consumed by the buffer's render calls.
///
/// Implementations decide what the control operations mean; the buffer and
/// engine only describe lines and spans.
pub trait DisplaySink {
    /// Move the cursor to the top-left so the next frame overwrites in place.
    fn move_home(&mut self) -> io::Result<()>;

    /// Clear the whole screen.
    fn clear_screen(&mut self) -> io::Result<()>;

    /// Clear from the cursor to the end of the current line.
    fn clear_line(&mut self) -> io::Result<()>;

    /// Write one full line: a plain prefix followed by a span in `tint`,
    /// terminated by a line break.
    fn write_line(&mut self, plain: &str, span: &str, tint: Tint) -> io::Result<()>;

    /// Write text in the default color, no line break.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Write text in `tint`, no line break.
    fn write_tinted(&mut self, text: &str, tint: Tint) -> io::Result<()>;

    /// Push buffered output to the terminal.
    fn flush(&mut self) -> io::Result<()>;
}

/// The real sink: queued crossterm commands on stdout.
///
/// Construction switches the terminal into raw mode (so key events reach the
/// event listener unbuffered) and hides the cursor.  Both are undone in
/// `Drop`, which makes the restore unconditional.
pub struct TerminalSink {
    out: Stdout,
}

impl TerminalSink {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, cursor::Hide, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(TerminalSink { out })
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl DisplaySink for TerminalSink {
    fn move_home(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn clear_line(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::UntilNewLine))
    }

    fn write_line(&mut self, plain: &str, span: &str, tint: Tint) -> io::Result<()> {
        // Raw mode: the newline alone does not return the carriage.
        queue!(
            self.out,
            Print(plain),
            SetForegroundColor(tint.color()),
            Print(span),
            ResetColor,
            Print("\r\n"),
        )
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn write_tinted(&mut self, text: &str, tint: Tint) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(tint.color()),
            Print(text),
            ResetColor,
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    MoveHome,
    ClearScreen,
    ClearLine,
    Line {
        plain: String,
        span: String,
        tint: Tint,
    },
    Text(String),
    Tinted(String, Tint),
}

/// A sink that records every call instead of touching a terminal.
///
/// Tests drive the engine against this and assert on the captured frames.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<SinkOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink { ops: Vec::new() }
    }

    /// All recorded full lines as `(text, tint)` pairs, plain prefix and
    /// tinted span joined.
    pub fn lines(&self) -> Vec<(String, Tint)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::Line { plain, span, tint } => {
                    Some((format!("{}{}", plain, span), *tint))
                }
                _ => None,
            })
            .collect()
    }

    /// Number of recorded lines carrying the given tint.
    pub fn line_count(&self, tint: Tint) -> usize {
        self.lines().iter().filter(|(_, t)| *t == tint).count()
    }
}

impl DisplaySink for RecordingSink {
    fn move_home(&mut self) -> io::Result<()> {
        self.ops.push(SinkOp::MoveHome);
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.ops.push(SinkOp::ClearScreen);
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.ops.push(SinkOp::ClearLine);
        Ok(())
    }

    fn write_line(&mut self, plain: &str, span: &str, tint: Tint) -> io::Result<()> {
        self.ops.push(SinkOp::Line {
            plain: plain.to_string(),
            span: span.to_string(),
            tint,
        });
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.ops.push(SinkOp::Text(text.to_string()));
        Ok(())
    }

    fn write_tinted(&mut self, text: &str, tint: Tint) -> io::Result<()> {
        self.ops.push(SinkOp::Tinted(text.to_string(), tint));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
