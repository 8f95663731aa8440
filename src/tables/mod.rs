//! Translation Table Lookup
//!
//! The contract the surrounding system uses to find table files, plus a
//! resolver that serves every table from one local directory.

mod resolver;

pub use resolver::{DirectoryTableResolver, ResolverError, TableResolver};
