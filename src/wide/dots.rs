//! Dots codec
//!
//! Carries braille cells instead of text. A cell is a unit with the dots
//! flag (`0x8000`) set and dot *n* in bit *n - 1*; on the host side the same
//! eight bits select a character from the braille-pattern block, so cell
//! `0x8000 | bits` is `U+2800 + bits`.

use super::codec::{ByteSink, ByteSource, CharSource, CoderResult, Decoder, Encoder};
use super::registry::Encoding;
use super::width::WideCharWidth;

/// Flag marking a unit as a cell rather than a character
pub const DOTS_FLAG: u32 = 0x8000;

/// First character of the braille-pattern block
pub const BRAILLE_BASE: u32 = 0x2800;

/// Cell for a braille-pattern character, if it is one
pub fn cell_for_char(c: char) -> Option<u32> {
    let bits = u32::from(c).checked_sub(BRAILLE_BASE)?;
    (bits <= 0xFF).then_some(DOTS_FLAG | bits)
}

/// Braille-pattern character for a cell, if the unit is one
pub fn char_for_cell(unit: u32) -> Option<char> {
    if unit & !0xFF != DOTS_FLAG {
        return None;
    }
    char::from_u32(BRAILLE_BASE + (unit & 0xFF))
}

/// Braille text to cells
#[derive(Debug)]
pub struct DotsEncoder {
    width: WideCharWidth,
}

impl DotsEncoder {
    pub fn new(width: WideCharWidth) -> Self {
        Self { width }
    }
}

impl Encoder for DotsEncoder {
    fn encoding(&self) -> Encoding {
        Encoding::dots(self.width)
    }

    fn reset(&mut self) {}

    fn encode(
        &mut self,
        input: &mut CharSource<'_>,
        output: &mut ByteSink<'_>,
        _end_of_input: bool,
    ) -> CoderResult {
        while let Some(c) = input.peek() {
            let Some(cell) = cell_for_char(c) else {
                return CoderResult::Unmappable(1);
            };
            if !output.put_unit(self.width, cell) {
                return CoderResult::Overflow;
            }
            input.advance();
        }
        CoderResult::Underflow
    }

    fn flush(&mut self, _output: &mut ByteSink<'_>) -> CoderResult {
        CoderResult::Underflow
    }
}

/// Cells to braille text
#[derive(Debug)]
pub struct DotsDecoder {
    width: WideCharWidth,
}

impl DotsDecoder {
    pub fn new(width: WideCharWidth) -> Self {
        Self { width }
    }
}

impl Decoder for DotsDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::dots(self.width)
    }

    fn reset(&mut self) {}

    fn decode(
        &mut self,
        input: &mut ByteSource<'_>,
        output: &mut String,
        end_of_input: bool,
    ) -> CoderResult {
        while let Some(unit) = input.peek_unit(self.width) {
            let Some(c) = char_for_cell(unit) else {
                return CoderResult::Unmappable(self.width.bytes());
            };
            output.push(c);
            input.advance(self.width.bytes());
        }
        if end_of_input && input.has_remaining() {
            CoderResult::Malformed(input.remaining())
        } else {
            CoderResult::Underflow
        }
    }

    fn flush(&mut self, _output: &mut String) -> CoderResult {
        CoderResult::Underflow
    }
}
