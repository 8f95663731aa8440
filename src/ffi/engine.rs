//! Foreign Engine Handle
//!
//! Binds the few entry points of the text-processing library that the
//! marshaling layer itself depends on: its version and the width of its
//! `widechar` type.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::Path;

use tracing::debug;

use super::loader::{DynamicLibrary, LibraryLoader};
use super::EngineError;
use crate::wide::{width, WideCharWidth};

/// Library name searched for when none is configured
pub const DEFAULT_LIBRARY: &str = "louis";

type VersionFn = unsafe extern "C" fn() -> *const c_char;
type CharSizeFn = unsafe extern "C" fn() -> c_int;

/// A loaded foreign engine
#[derive(Debug)]
pub struct Engine {
    library: DynamicLibrary,
}

impl Engine {
    /// Load the engine by name or path from the default search paths
    pub fn load(name: &str) -> Result<Self, EngineError> {
        Self::load_with(&LibraryLoader::new(), name)
    }

    /// Load the engine through a configured loader
    pub fn load_with(loader: &LibraryLoader, name: &str) -> Result<Self, EngineError> {
        let library = loader.load(name)?;
        Ok(Self { library })
    }

    pub fn path(&self) -> &Path {
        self.library.path()
    }

    /// Version string reported by `lou_version`
    pub fn version(&self) -> Result<String, EngineError> {
        // Safety: lou_version takes no arguments and returns a static
        // NUL-terminated string.
        let text = unsafe {
            let version = self.library.symbol::<VersionFn>("lou_version")?;
            let raw = version();
            if raw.is_null() {
                return Err(EngineError::CallFailed("lou_version returned null".into()));
            }
            CStr::from_ptr(raw)
        };
        Ok(text.to_string_lossy().into_owned())
    }

    /// Width of the engine's `widechar`, from `lou_charSize`
    pub fn char_size(&self) -> Result<WideCharWidth, EngineError> {
        // Safety: lou_charSize takes no arguments and returns an int.
        let bytes = unsafe {
            let char_size = self.library.symbol::<CharSizeFn>("lou_charSize")?;
            char_size()
        };
        let bytes = usize::try_from(bytes)
            .map_err(|_| EngineError::CallFailed(format!("lou_charSize returned {}", bytes)))?;
        Ok(WideCharWidth::from_bytes(bytes)?)
    }

    /// Fix the process width to the engine's `widechar`.
    ///
    /// Must run before the first buffer is created; afterwards it only
    /// succeeds if the engine agrees with the width already in use.
    pub fn pin_width(&self) -> Result<WideCharWidth, EngineError> {
        let engine_width = self.char_size()?;
        width::pin(engine_width)?;
        debug!(width = %engine_width, path = %self.path().display(), "engine width pinned");
        Ok(engine_width)
    }
}
