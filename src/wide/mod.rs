//! Wide Character Marshaling
//!
//! Moves Unicode text between Rust strings and the fixed-width character
//! buffers of a foreign text-processing library.
//!
//! # Architecture
//!
//! ```text
//! &str ──write()──▶ CodecRegistry (locked encoder) ──▶ WideString memory
//!                                                           │
//!                                               pointer() ──▶ foreign engine
//!                                                           │
//! String ◀──read()── CodecRegistry (locked decoder) ◀───────┘
//! ```
//!
//! The unit width (2 or 4 bytes) is fixed per process by [`width::current`].
//! Two encodings share every buffer: native text (UTF-16LE or UTF-32LE) and
//! dots, which carries braille cells as characters of the braille-pattern
//! block.
//!
//! # Example
//!
//! ```rust
//! use louis_marshal::wide::WideString;
//!
//! let buffer = WideString::with_capacity(16);
//! buffer.write("braille")?;
//!
//! let tail = buffer.subview(2, 7)?;
//! assert_eq!(tail.to_text()?, "aille");
//!
//! buffer.write_dots("\u{2803}\u{2817}")?;
//! assert_eq!(buffer.read_dots(2)?, "\u{2803}\u{2817}");
//! # Ok::<(), louis_marshal::wide::MarshalError>(())
//! ```

pub mod codec;
pub mod dots;
mod error;
mod memory;
mod registry;
mod string;
pub mod utf;
pub mod width;

pub use error::{CodingError, MarshalError, MarshalResult};
pub use memory::NativeMemory;
pub use registry::{registry, CodecRegistry, Encoding, EncodingFamily};
pub use string::{WideString, WideStringView};
pub use width::WideCharWidth;

#[cfg(test)]
mod tests;
