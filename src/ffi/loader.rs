//! Dynamic Library Loader
//!
//! Finds and opens the foreign engine's shared library.

use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::debug;

use super::EngineError;

/// A dynamically loaded library
#[derive(Debug)]
pub struct DynamicLibrary {
    /// Path the library was opened from
    path: PathBuf,
    /// The loaded library handle
    library: Library,
}

impl DynamicLibrary {
    /// Load a library from the given path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();

        // Safety: opening a library runs its initialisers. We trust the
        // path the caller configured.
        let library = unsafe {
            Library::new(&path).map_err(|e| {
                EngineError::LoadError(format!(
                    "Failed to load library '{}': {}",
                    path.display(),
                    e
                ))
            })?
        };
        debug!(path = %path.display(), "loaded foreign library");

        Ok(Self { path, library })
    }

    /// Get the path to this library
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a symbol by name.
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the exported symbol.
    pub unsafe fn symbol<T>(&self, name: &str) -> Result<Symbol<'_, T>, EngineError> {
        self.library.get(name.as_bytes()).map_err(|e| {
            EngineError::SymbolNotFound(format!(
                "Symbol '{}' not found in '{}': {}",
                name,
                self.path.display(),
                e
            ))
        })
    }
}

/// Library loader with search paths
#[derive(Debug, Clone)]
pub struct LibraryLoader {
    /// Search paths for libraries
    search_paths: Vec<PathBuf>,
}

impl LibraryLoader {
    /// Loader over the platform library paths
    pub fn new() -> Self {
        Self {
            search_paths: default_search_paths(),
        }
    }

    /// Add a search path, tried before the platform defaults
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) {
        self.search_paths.insert(0, path.as_ref().to_path_buf());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find a library by name or path
    pub fn find_library(&self, name: &str) -> Option<PathBuf> {
        // If it's already a path, check if it exists
        let path = Path::new(name);
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        let candidates = library_candidates(name);
        self.search_paths
            .iter()
            .flat_map(|dir| candidates.iter().map(move |file| dir.join(file)))
            .find(|candidate| candidate.is_file())
    }

    /// Find and load a library
    pub fn load(&self, name: &str) -> Result<DynamicLibrary, EngineError> {
        let path = self
            .find_library(name)
            .ok_or_else(|| EngineError::LoadError(format!("Library '{}' not found", name)))?;
        DynamicLibrary::load(path)
    }
}

impl Default for LibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// ABI version of the liblouis soname
const SONAME_VERSION: &str = "20";

/// Directories searched after the configured ones
fn default_search_paths() -> Vec<PathBuf> {
    let (var, sep, system): (&str, char, &[&str]) = if cfg!(target_os = "macos") {
        ("DYLD_LIBRARY_PATH", ':', &["/opt/homebrew/lib", "/usr/local/lib"])
    } else if cfg!(windows) {
        ("PATH", ';', &[])
    } else {
        ("LD_LIBRARY_PATH", ':', &["/usr/local/lib", "/usr/lib", "/usr/lib64", "/lib"])
    };

    let mut paths: Vec<PathBuf> = std::env::var(var)
        .map(|value| value.split(sep).filter(|p| !p.is_empty()).map(PathBuf::from).collect())
        .unwrap_or_default();
    paths.extend(system.iter().map(PathBuf::from));
    if cfg!(all(unix, not(target_os = "macos"))) {
        // Debian-style multiarch directory
        let multiarch = format!("/usr/lib/{}-linux-gnu", std::env::consts::ARCH);
        paths.push(PathBuf::from(multiarch));
    }
    paths
}

/// File names a library called `name` may be installed under, in lookup
/// order. A name that already looks like a file name is used as is.
///
/// Runtime-only installs of liblouis ship just the versioned soname
/// (`liblouis.so.20`), so that is tried after the unversioned link.
pub(crate) fn library_candidates(name: &str) -> Vec<String> {
    let (prefix, suffix) = if cfg!(target_os = "macos") {
        ("lib", ".dylib")
    } else if cfg!(windows) {
        ("", ".dll")
    } else {
        ("lib", ".so")
    };
    if name.contains(suffix) {
        return vec![name.to_string()];
    }

    let stem = if name.starts_with(prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name)
    };
    if cfg!(target_os = "macos") {
        vec![format!("{stem}{suffix}"), format!("{stem}.{SONAME_VERSION}{suffix}")]
    } else if cfg!(windows) && !stem.starts_with("lib") {
        vec![format!("{stem}{suffix}"), format!("lib{stem}{suffix}")]
    } else if cfg!(windows) {
        vec![format!("{stem}{suffix}")]
    } else {
        vec![format!("{stem}{suffix}"), format!("{stem}{suffix}.{SONAME_VERSION}")]
    }
}
