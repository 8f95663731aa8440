//! Encoding Registry
//!
//! The four shared codec objects used by every wide buffer in the process.
//! Each one sits behind its own lock, so a thread decoding native text never
//! waits on a thread encoding dots.

use std::fmt;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::debug;

use super::codec::{decode_all, encode_all, Decoder, Encoder};
use super::dots::{DotsDecoder, DotsEncoder};
use super::error::MarshalResult;
use super::utf::{Utf16Decoder, Utf16Encoder, Utf32Decoder, Utf32Encoder};
use super::width::{self, WideCharWidth};

/// What a buffer's code units mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingFamily {
    /// Natural-language text
    NativeText,
    /// Braille cells
    Dots,
}

/// A concrete encoding: family plus unit width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    NativeText16,
    NativeText32,
    Dots16,
    Dots32,
}

impl Encoding {
    pub fn new(family: EncodingFamily, width: WideCharWidth) -> Self {
        match family {
            EncodingFamily::NativeText => Self::native_text(width),
            EncodingFamily::Dots => Self::dots(width),
        }
    }

    pub fn native_text(width: WideCharWidth) -> Self {
        match width {
            WideCharWidth::Two => Encoding::NativeText16,
            WideCharWidth::Four => Encoding::NativeText32,
        }
    }

    pub fn dots(width: WideCharWidth) -> Self {
        match width {
            WideCharWidth::Two => Encoding::Dots16,
            WideCharWidth::Four => Encoding::Dots32,
        }
    }

    pub fn family(self) -> EncodingFamily {
        match self {
            Encoding::NativeText16 | Encoding::NativeText32 => EncodingFamily::NativeText,
            Encoding::Dots16 | Encoding::Dots32 => EncodingFamily::Dots,
        }
    }

    pub fn width(self) -> WideCharWidth {
        match self {
            Encoding::NativeText16 | Encoding::Dots16 => WideCharWidth::Two,
            Encoding::NativeText32 | Encoding::Dots32 => WideCharWidth::Four,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::NativeText16 => "UTF-16LE",
            Encoding::NativeText32 => "UTF-32LE",
            Encoding::Dots16 => "DOTSIO-16",
            Encoding::Dots32 => "DOTSIO-32",
        }
    }

    /// Number of code units `text` occupies in this encoding.
    ///
    /// Only UTF-16 spends two units on a character; every other encoding
    /// uses one unit per scalar value.
    pub fn units_for(self, text: &str) -> usize {
        match self {
            Encoding::NativeText16 => text.encode_utf16().count(),
            Encoding::NativeText32 | Encoding::Dots16 | Encoding::Dots32 => text.chars().count(),
        }
    }

    fn new_encoder(self) -> Box<dyn Encoder> {
        match self {
            Encoding::NativeText16 => Box::new(Utf16Encoder::new()),
            Encoding::NativeText32 => Box::new(Utf32Encoder::new()),
            Encoding::Dots16 | Encoding::Dots32 => Box::new(DotsEncoder::new(self.width())),
        }
    }

    fn new_decoder(self) -> Box<dyn Decoder> {
        match self {
            Encoding::NativeText16 => Box::new(Utf16Decoder::new()),
            Encoding::NativeText32 => Box::new(Utf32Decoder::new()),
            Encoding::Dots16 | Encoding::Dots32 => Box::new(DotsDecoder::new(self.width())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The shared encoder/decoder pairs for one unit width
#[derive(Debug)]
pub struct CodecRegistry {
    width: WideCharWidth,
    text_encoder: Mutex<Box<dyn Encoder>>,
    text_decoder: Mutex<Box<dyn Decoder>>,
    dots_encoder: Mutex<Box<dyn Encoder>>,
    dots_decoder: Mutex<Box<dyn Decoder>>,
}

impl CodecRegistry {
    /// Build a private registry. Buffers always use [`registry`]; this is
    /// for callers that transcode without a buffer.
    pub fn new(width: WideCharWidth) -> Self {
        let text = Encoding::native_text(width);
        let dots = Encoding::dots(width);
        Self {
            width,
            text_encoder: Mutex::new(text.new_encoder()),
            text_decoder: Mutex::new(text.new_decoder()),
            dots_encoder: Mutex::new(dots.new_encoder()),
            dots_decoder: Mutex::new(dots.new_decoder()),
        }
    }

    pub fn width(&self) -> WideCharWidth {
        self.width
    }

    pub fn encoding(&self, family: EncodingFamily) -> Encoding {
        Encoding::new(family, self.width)
    }

    fn encoder(&self, family: EncodingFamily) -> &Mutex<Box<dyn Encoder>> {
        match family {
            EncodingFamily::NativeText => &self.text_encoder,
            EncodingFamily::Dots => &self.dots_encoder,
        }
    }

    fn decoder(&self, family: EncodingFamily) -> &Mutex<Box<dyn Decoder>> {
        match family {
            EncodingFamily::NativeText => &self.text_decoder,
            EncodingFamily::Dots => &self.dots_decoder,
        }
    }

    /// Encode `text` into exactly `units` code units, holding the family's
    /// encoder for the whole reset/encode/flush sequence.
    pub fn encode(&self, family: EncodingFamily, text: &str, units: usize) -> MarshalResult<Vec<u8>> {
        let mut encoder = self.encoder(family).lock();
        encode_all(encoder.as_mut(), text, units)
    }

    /// Decode `bytes`, which hold exactly `units` code units, holding the
    /// family's decoder for the whole reset/decode/flush sequence.
    pub fn decode(&self, family: EncodingFamily, bytes: &[u8], units: usize) -> MarshalResult<String> {
        let mut decoder = self.decoder(family).lock();
        decode_all(decoder.as_mut(), bytes, units)
    }
}

static REGISTRY: OnceCell<CodecRegistry> = OnceCell::new();

/// The process-wide registry, built on first use for [`width::current`].
pub fn registry() -> &'static CodecRegistry {
    REGISTRY.get_or_init(|| {
        let width = width::current();
        debug!(%width, "initialising codec registry");
        CodecRegistry::new(width)
    })
}
