//! Table Resolvers

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Errors raised by table resolvers
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read table directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Maps logical table names to storage locations
pub trait TableResolver {
    /// Location of `table`, optionally relative to `base`.
    ///
    /// `None` means "unresolved" and is not an error: callers may go on to
    /// ask another resolver.
    fn resolve(&self, table: &str, base: Option<&Path>) -> Option<PathBuf>;

    /// Names of the tables this resolver can see, in no particular order
    fn list(&self) -> Result<HashSet<String>, ResolverError>;
}

/// Resolves every table inside one local directory
#[derive(Debug, Clone)]
pub struct DirectoryTableResolver {
    dir: PathBuf,
}

impl DirectoryTableResolver {
    /// Bind to `dir`, which must already exist and be a directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let dir = dir.as_ref().to_path_buf();
        let metadata = match fs::metadata(&dir) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolverError::NotFound(dir));
            }
            Err(source) => return Err(ResolverError::Io { path: dir, source }),
        };
        if !metadata.is_dir() {
            return Err(ResolverError::NotADirectory(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableResolver for DirectoryTableResolver {
    /// Tables always live directly under the directory, so `base` is
    /// ignored. The result is made absolute; names that cannot form a path
    /// are unresolved.
    fn resolve(&self, table: &str, _base: Option<&Path>) -> Option<PathBuf> {
        if table.is_empty() || table.contains('\0') {
            return None;
        }
        std::path::absolute(self.dir.join(table)).ok()
    }

    fn list(&self) -> Result<HashSet<String>, ResolverError> {
        let io_error = |source| ResolverError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut tables = HashSet::new();
        for entry in fs::read_dir(&self.dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            // Follows symlinks, so a link to a table file counts as a table.
            let is_file = fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    tables.insert(name);
                }
                Err(name) => warn!(?name, "skipping table with non UTF-8 name"),
            }
        }
        Ok(tables)
    }
}
