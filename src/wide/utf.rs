//! Native text codecs (UTF-16LE and UTF-32LE)

use super::codec::{ByteSink, ByteSource, CharSource, CoderResult, Decoder, Encoder};
use super::registry::Encoding;
use super::width::WideCharWidth;

fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Trailing bytes too short to form a unit are malformed once input has ended.
fn exhausted(input: &ByteSource<'_>, end_of_input: bool) -> CoderResult {
    if end_of_input && input.has_remaining() {
        CoderResult::Malformed(input.remaining())
    } else {
        CoderResult::Underflow
    }
}

/// UTF-16LE encoder.
///
/// Holds the low half of a surrogate pair when the output filled up between
/// the two units.
#[derive(Debug, Default)]
pub struct Utf16Encoder {
    pending_low: Option<u16>,
}

impl Utf16Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn drain_pending(&mut self, output: &mut ByteSink<'_>) -> bool {
        match self.pending_low {
            Some(low) if output.put_unit(WideCharWidth::Two, u32::from(low)) => {
                self.pending_low = None;
                true
            }
            Some(_) => false,
            None => true,
        }
    }
}

impl Encoder for Utf16Encoder {
    fn encoding(&self) -> Encoding {
        Encoding::NativeText16
    }

    fn reset(&mut self) {
        self.pending_low = None;
    }

    fn encode(
        &mut self,
        input: &mut CharSource<'_>,
        output: &mut ByteSink<'_>,
        _end_of_input: bool,
    ) -> CoderResult {
        loop {
            if !self.drain_pending(output) {
                return CoderResult::Overflow;
            }
            let Some(c) = input.peek() else {
                return CoderResult::Underflow;
            };
            let mut units = [0u16; 2];
            let encoded = c.encode_utf16(&mut units);
            if !output.put_unit(WideCharWidth::Two, u32::from(encoded[0])) {
                return CoderResult::Overflow;
            }
            if encoded.len() == 2 {
                self.pending_low = Some(encoded[1]);
            }
            input.advance();
        }
    }

    fn flush(&mut self, output: &mut ByteSink<'_>) -> CoderResult {
        if self.drain_pending(output) {
            CoderResult::Underflow
        } else {
            CoderResult::Overflow
        }
    }
}

/// UTF-16LE decoder.
///
/// A high surrogate is consumed as soon as it is seen and held until its
/// low half arrives, possibly in a later call.
#[derive(Debug, Default)]
pub struct Utf16Decoder {
    pending_high: Option<u32>,
}

impl Utf16Decoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for Utf16Decoder {
    fn encoding(&self) -> Encoding {
        Encoding::NativeText16
    }

    fn reset(&mut self) {
        self.pending_high = None;
    }

    fn decode(
        &mut self,
        input: &mut ByteSource<'_>,
        output: &mut String,
        end_of_input: bool,
    ) -> CoderResult {
        loop {
            let Some(unit) = input.peek_unit(WideCharWidth::Two) else {
                if end_of_input && self.pending_high.is_some() {
                    return CoderResult::Malformed(2);
                }
                return exhausted(input, end_of_input);
            };

            match self.pending_high {
                Some(high) => {
                    if !is_low_surrogate(unit) {
                        return CoderResult::Malformed(2);
                    }
                    let scalar = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
                    let Some(c) = char::from_u32(scalar) else {
                        return CoderResult::Malformed(4);
                    };
                    self.pending_high = None;
                    output.push(c);
                }
                None if is_high_surrogate(unit) => self.pending_high = Some(unit),
                None => {
                    // A lone low surrogate is the only BMP value char rejects.
                    let Some(c) = char::from_u32(unit) else {
                        return CoderResult::Malformed(2);
                    };
                    output.push(c);
                }
            }
            input.advance(2);
        }
    }

    fn flush(&mut self, _output: &mut String) -> CoderResult {
        if self.pending_high.is_some() {
            CoderResult::Malformed(2)
        } else {
            CoderResult::Underflow
        }
    }
}

/// UTF-32LE encoder. Every scalar value fits one unit, so there is no
/// partial state to carry.
#[derive(Debug, Default)]
pub struct Utf32Encoder;

impl Utf32Encoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for Utf32Encoder {
    fn encoding(&self) -> Encoding {
        Encoding::NativeText32
    }

    fn reset(&mut self) {}

    fn encode(
        &mut self,
        input: &mut CharSource<'_>,
        output: &mut ByteSink<'_>,
        _end_of_input: bool,
    ) -> CoderResult {
        while let Some(c) = input.peek() {
            if !output.put_unit(WideCharWidth::Four, u32::from(c)) {
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

/// UTF-32LE decoder
#[derive(Debug, Default)]
pub struct Utf32Decoder;

impl Utf32Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Utf32Decoder {
    fn encoding(&self) -> Encoding {
        Encoding::NativeText32
    }

    fn reset(&mut self) {}

    fn decode(
        &mut self,
        input: &mut ByteSource<'_>,
        output: &mut String,
        end_of_input: bool,
    ) -> CoderResult {
        while let Some(unit) = input.peek_unit(WideCharWidth::Four) {
            match char::from_u32(unit) {
                Some(c) => output.push(c),
                None => return CoderResult::Malformed(4),
            }
            input.advance(4);
        }
        exhausted(input, end_of_input)
    }

    fn flush(&mut self, _output: &mut String) -> CoderResult {
        CoderResult::Underflow
    }
}
