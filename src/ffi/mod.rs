//! Foreign Engine Interface
//!
//! Locates and opens the native text-processing library so that wide
//! buffers can be sized for the `widechar` it was built with.
//!
//! ```text
//! LibraryLoader (search paths) ──▶ DynamicLibrary (libloading)
//!                                        │
//!                                        ▼
//!                                 Engine::pin_width()
//!                                        │
//!                                        ▼
//!                                 wide::width::pin()
//! ```
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::load("louis")?;
//! engine.pin_width()?;
//! println!("liblouis {}", engine.version()?);
//! ```

mod engine;
mod loader;

pub use engine::{Engine, DEFAULT_LIBRARY};
pub use loader::{DynamicLibrary, LibraryLoader};

use thiserror::Error;

use crate::wide::MarshalError;

/// Error type for engine loading and queries
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Engine call failed: {0}")]
    CallFailed(String),

    #[error(transparent)]
    Width(#[from] MarshalError),
}
