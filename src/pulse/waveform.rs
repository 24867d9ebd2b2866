//! The heartbeat glyph and flat-line characters.
//!
//! One beat is a fixed 7×13 character picture, drawn into the scrolling
//! buffer one column at a time.  Between beats the trace alternates between
//! a low and a high flat-line character so the baseline does not look like a
//! solid bar.

use super::{BEAT_WIDTH, DEFAULT_HEIGHT};

//
//         |
//        /|
//       / |   |
// ___  /  |  /| /\____
//    \/   | / |/
//         |/
//         |
//
/// One heartbeat glyph, row-major.  Column 0 is the lead-in dip that joins
/// the previous flat run.
const BEAT: [[char; BEAT_WIDTH]; DEFAULT_HEIGHT] = [
    [' ', ' ', ' ', ' ', ' ', '|', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', ' ', '/', '|', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', '/', ' ', '|', ' ', ' ', ' ', '|', ' ', ' ', ' '],
    [' ', ' ', '/', ' ', ' ', '|', ' ', ' ', '/', '|', ' ', '/', '\\'],
    ['\\', '/', ' ', ' ', ' ', '|', ' ', '/', ' ', '|', '/', ' ', ' '],
    [' ', ' ', ' ', ' ', ' ', '|', '/', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', ' ', ' ', '|', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
];

/// Low flat-line character, drawn on the center row.
pub const BASELINE_LOW: char = '_';

/// High flat-line character, drawn one row below center.
pub const BASELINE_HIGH: char = '‾';

/// Character of the beat glyph at `(row, step)`.
///
/// Step indices come from loop counters shared with the flat-run logic, so
/// out-of-range coordinates are answered with a blank rather than a panic.
pub fn glyph_at(row: usize, step: usize) -> char {
    if row < DEFAULT_HEIGHT && step < BEAT_WIDTH {
        BEAT[row][step]
    } else {
        ' '
    }
}
