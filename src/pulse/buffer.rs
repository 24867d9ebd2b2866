//! The scrolling display buffer.
//!
//! A fixed-height character grid with a logical cursor marking the column
//! the animation last drew into.  The engine appends columns at the cursor
//! and shifts the grid left once it is full, which produces the ticker-style
//! scroll.  Terminal resizes arrive from the event listener thread, so the
//! grid lives behind an interior [`RwLock`]: mutation takes the write lock,
//! rendering only the read lock.

use std::io;
use std::sync::RwLock;

use crate::term::{DisplaySink, Tint};

use super::BEAT_WIDTH;

/// A fixed-height, resizable character grid with a current-column cursor.
pub struct DisplayBuffer {
    inner: RwLock<Grid>,
}

struct Grid {
    rows: Vec<Vec<char>>,
    width: usize,
    height: usize,
    /// Index of the rightmost active column, always in `[0, width - 1]`.
    cursor: usize,
}

impl DisplayBuffer {
    /// Create a blank buffer with the cursor at the first column.
    ///
    /// Width and height are floored at 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        DisplayBuffer {
            inner: RwLock::new(Grid {
                rows: vec![vec![' '; width]; height],
                width,
                height,
                cursor: 0,
            }),
        }
    }

    /// Resize the buffer to a new width; height never changes.
    ///
    /// Zero and unchanged widths are ignored.  Growing appends blank columns
    /// and leaves the cursor alone.  Shrinking by `d` drops the leftmost `d`
    /// characters of every row (the oldest history) and moves the cursor
    /// left by `d`, clamped at column 0.
    pub fn resize(&self, new_width: usize) {
        let mut g = self.inner.write().unwrap();

        if new_width == 0 || new_width == g.width {
            return;
        }

        if new_width > g.width {
            for row in &mut g.rows {
                row.resize(new_width, ' ');
            }
        } else {
            let d = g.width - new_width;
            for row in &mut g.rows {
                row.drain(..d);
            }
            g.cursor = g.cursor.saturating_sub(d);
        }

        g.width = new_width;
    }

    /// Advance to the next column.
    ///
    /// While the buffer is still filling, this just moves the cursor right.
    /// Once the cursor reaches the last column, every row scrolls one
    /// position left and a blank column appears under the cursor.
    pub fn shift(&self) {
        let mut g = self.inner.write().unwrap();

        if g.cursor < g.width - 1 {
            g.cursor += 1;
            return;
        }

        let w = g.width;
        for row in &mut g.rows {
            row.rotate_left(1);
            row[w - 1] = ' ';
        }
    }

    /// Write `ch` at `(row, cursor)`.  Out-of-range rows are ignored; they
    /// occur naturally when a resize races the animation.
    pub fn set_rune(&self, row: usize, ch: char) {
        let mut g = self.inner.write().unwrap();

        if row < g.height {
            let cursor = g.cursor;
            g.rows[row][cursor] = ch;
        }
    }

    /// Render the buffer with the trailing beat window in `tint`.
    ///
    /// The last [`BEAT_WIDTH`] columns before the cursor (the beat currently
    /// being drawn) take the tint; everything older renders in the default
    /// color.  While the buffer has not yet filled past one beat, the whole
    /// row is tinted.  The cursor is moved home first so successive frames
    /// overwrite in place.
    pub fn render_beat_colored(
        &self,
        sink: &mut dyn DisplaySink,
        tint: Tint,
    ) -> io::Result<()> {
        let g = self.inner.read().unwrap();

        let split = if g.cursor < BEAT_WIDTH { 0 } else { g.cursor - BEAT_WIDTH };

        sink.move_home()?;
        for row in &g.rows {
            let plain: String = row[..split].iter().collect();
            let span: String = row[split..].iter().collect();
            sink.write_line(&plain, &span, tint)?;
        }
        Ok(())
    }

    /// Render every visible column in a single tint; used by the shutdown
    /// flatline, which is drawn in the default color.
    pub fn render_all_colored(
        &self,
        sink: &mut dyn DisplaySink,
        tint: Tint,
    ) -> io::Result<()> {
        let g = self.inner.read().unwrap();

        sink.move_home()?;
        for row in &g.rows {
            let span: String = row.iter().collect();
            sink.write_line("", &span, tint)?;
        }
        Ok(())
    }

    /// Current width in columns.
    pub fn width(&self) -> usize {
        self.inner.read().unwrap().width
    }

    /// Height in rows, fixed for the lifetime of the buffer.
    pub fn height(&self) -> usize {
        self.inner.read().unwrap().height
    }

    /// Current cursor column.
    pub fn cursor(&self) -> usize {
        self.inner.read().unwrap().cursor
    }

    /// The contents of one row as a string, or `None` if out of range.
    pub fn row_string(&self, row: usize) -> Option<String> {
        let g = self.inner.read().unwrap();
        g.rows.get(row).map(|r| r.iter().collect())
    }
}
