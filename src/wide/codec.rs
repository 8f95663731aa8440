//! Codec Engine
//!
//! Strict, stateful encoders and decoders between host strings and the
//! little-endian code units of the foreign buffer.
//!
//! A codec is driven the same way every time: `reset`, one transcode call
//! with `end_of_input` set, then `flush`. Anything other than
//! [`CoderResult::Underflow`] from either step fails the whole operation.

use std::fmt;

use tracing::{debug, error};

use super::error::{CodingError, MarshalError, MarshalResult};
use super::registry::Encoding;
use super::width::WideCharWidth;

/// Outcome of a single transcode or flush step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoderResult {
    /// All available input was consumed
    Underflow,
    /// The output has no room for the next unit
    Overflow,
    /// Invalid sequence of the given length at the current input position
    Malformed(usize),
    /// Valid input with no target representation
    Unmappable(usize),
}

impl CoderResult {
    pub fn is_underflow(self) -> bool {
        matches!(self, CoderResult::Underflow)
    }

    /// Turn a non-underflow result into the error it stands for
    fn check(self, encoding: Encoding, offset: usize) -> MarshalResult<()> {
        match self {
            CoderResult::Underflow => Ok(()),
            CoderResult::Malformed(length) => Err(CodingError::Malformed {
                encoding,
                offset,
                length,
            }
            .into()),
            CoderResult::Unmappable(length) => Err(CodingError::Unmappable {
                encoding,
                offset,
                length,
            }
            .into()),
            CoderResult::Overflow => Err(MarshalError::InvariantViolation(
                "codec output overflowed a buffer sized for its input",
            )),
        }
    }
}

/// Read cursor over encoded bytes
#[derive(Debug)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    /// Peek one little-endian unit of the given width without consuming it
    pub fn peek_unit(&self, width: WideCharWidth) -> Option<u32> {
        let end = self.pos.checked_add(width.bytes())?;
        let raw = self.bytes.get(self.pos..end)?;
        Some(match width {
            WideCharWidth::Two => u32::from(u16::from_le_bytes([raw[0], raw[1]])),
            WideCharWidth::Four => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
        })
    }

    pub fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.bytes.len());
    }
}

/// Write cursor over a fixed-size byte buffer
#[derive(Debug)]
pub struct ByteSink<'a> {
    bytes: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteSink<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    /// Append one little-endian unit; false if it does not fit
    pub fn put_unit(&mut self, width: WideCharWidth, unit: u32) -> bool {
        let size = width.bytes();
        if self.remaining() < size {
            return false;
        }
        let target = &mut self.bytes[self.pos..self.pos + size];
        match width {
            // Callers only hand 16-bit values to a 2-byte sink.
            WideCharWidth::Two => target.copy_from_slice(&(unit as u16).to_le_bytes()),
            WideCharWidth::Four => target.copy_from_slice(&unit.to_le_bytes()),
        }
        self.pos += size;
        true
    }
}

/// Read cursor over a host string, counting characters consumed
#[derive(Debug)]
pub struct CharSource<'a> {
    text: &'a str,
    index: usize,
    consumed: usize,
}

impl<'a> CharSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            index: 0,
            consumed: 0,
        }
    }

    /// Characters consumed so far
    pub fn position(&self) -> usize {
        self.consumed
    }

    pub fn has_remaining(&self) -> bool {
        self.index < self.text.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.text[self.index..].chars().next()
    }

    pub fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.index += c.len_utf8();
            self.consumed += 1;
        }
    }
}

/// Host string to code units
pub trait Encoder: Send + fmt::Debug {
    fn encoding(&self) -> Encoding;

    /// Drop any partial sequence left by a previous operation
    fn reset(&mut self);

    fn encode(
        &mut self,
        input: &mut CharSource<'_>,
        output: &mut ByteSink<'_>,
        end_of_input: bool,
    ) -> CoderResult;

    /// Emit whatever partial sequence is still held
    fn flush(&mut self, output: &mut ByteSink<'_>) -> CoderResult;
}

/// Code units to host string
pub trait Decoder: Send + fmt::Debug {
    fn encoding(&self) -> Encoding;

    /// Drop any partial sequence left by a previous operation
    fn reset(&mut self);

    fn decode(
        &mut self,
        input: &mut ByteSource<'_>,
        output: &mut String,
        end_of_input: bool,
    ) -> CoderResult;

    /// Report a partial sequence that never completed
    fn flush(&mut self, output: &mut String) -> CoderResult;
}

/// Encode `text` as exactly `units` code units.
///
/// `units` must come from [`Encoding::units_for`] of the encoder's encoding.
pub fn encode_all(encoder: &mut dyn Encoder, text: &str, units: usize) -> MarshalResult<Vec<u8>> {
    let encoding = encoder.encoding();
    let mut bytes = vec![0u8; units * encoding.width().bytes()];
    let mut input = CharSource::new(text);
    let mut output = ByteSink::new(&mut bytes);

    encoder.reset();
    let result = encoder.encode(&mut input, &mut output, true);
    report(result.check(encoding, input.position()))?;
    let result = encoder.flush(&mut output);
    report(result.check(encoding, input.position()))?;

    if input.has_remaining() {
        return report(Err(MarshalError::InvariantViolation(
            "encoder reported success with input left over",
        )));
    }
    if output.has_remaining() {
        return report(Err(MarshalError::InvariantViolation(
            "encoder left output space unfilled",
        )));
    }
    Ok(bytes)
}

/// Decode all of `bytes`, which must hold exactly `units` code units.
pub fn decode_all(decoder: &mut dyn Decoder, bytes: &[u8], units: usize) -> MarshalResult<String> {
    let encoding = decoder.encoding();
    let mut input = ByteSource::new(bytes);
    let mut output = String::with_capacity(units);

    decoder.reset();
    let result = decoder.decode(&mut input, &mut output, true);
    report(result.check(encoding, input.position()))?;
    let result = decoder.flush(&mut output);
    report(result.check(encoding, input.position()))?;

    if input.has_remaining() {
        return report(Err(MarshalError::InvariantViolation(
            "decoder reported success with input left over",
        )));
    }
    if encoding.units_for(&output) != units {
        return report(Err(MarshalError::InvariantViolation(
            "decoded text does not fill the requested length",
        )));
    }
    Ok(output)
}

fn report<T>(result: MarshalResult<T>) -> MarshalResult<T> {
    match &result {
        Err(e) if e.is_defect() => error!(error = %e, "codec defect"),
        Err(e) => debug!(error = %e, "transcoding failed"),
        Ok(_) => {}
    }
    result
}
