//! louis-marshal - Wide Character Marshaling for liblouis
//!
//! Moves Unicode text between Rust strings and the fixed-width `widechar`
//! buffers that the liblouis braille engine reads and writes.
//!
//! # Features
//!
//! - **Fixed-capacity wide buffers**: lazily allocated native memory sized in code units
//! - **Two encodings per buffer**: native text (UTF-16LE/UTF-32LE) and braille dots
//! - **Strict transcoding**: malformed or unmappable input is an error, never replaced
//! - **Zero-copy sub-views**: borrow a window of a buffer for the engine to address
//! - **Shared codecs**: four process-wide encoder/decoder objects, each behind its own lock
//! - **Table lookup**: a directory-backed resolver for translation table files
//!
//! # Example
//!
//! ```rust
//! use louis_marshal::WideString;
//!
//! let input = WideString::from_text("hello")?;
//! let output = WideString::with_capacity(32);
//!
//! // Hand input.pointer()? and output.pointer()? to the engine, then:
//! output.write_dots("\u{2813}\u{2811}")?;
//! assert_eq!(output.read_dots(2)?, "\u{2813}\u{2811}");
//! assert_eq!(input.to_text()?, "hello");
//! # Ok::<(), louis_marshal::MarshalError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  width resolver  │  wchar_t size, or pinned from lou_charSize()
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  codec registry  │  4 strict codecs, one lock each
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   WideString     │  owned memory, borrowed by views
//! └────────┬─────────┘
//!          ▼
//!    foreign engine
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod ffi;
pub mod tables;
pub mod wide;

pub use config::{ConfigError, ConfigResult, MarshalConfig};
pub use ffi::{Engine, EngineError, LibraryLoader};
pub use tables::{DirectoryTableResolver, ResolverError, TableResolver};
pub use wide::{
    CodecRegistry, CodingError, Encoding, EncodingFamily, MarshalError, MarshalResult,
    WideCharWidth, WideString, WideStringView,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
