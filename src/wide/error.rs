//! Marshaling Errors
//!
//! Failure kinds reported by the wide buffer and its codecs.

use thiserror::Error;

use super::registry::Encoding;

/// Result type for marshaling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;

/// A transcoding step could not represent its input exactly.
///
/// `offset` is the input position at which the failure was detected (bytes
/// when decoding, characters when encoding) and `length` is the size of the
/// offending sequence in the same unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodingError {
    /// The input is not a valid unit sequence for the encoding.
    #[error("malformed {encoding} input: {length} unit(s) at offset {offset}")]
    Malformed {
        encoding: Encoding,
        offset: usize,
        length: usize,
    },

    /// The input is valid but has no representation in the target.
    #[error("unmappable character for {encoding}: {length} unit(s) at offset {offset}")]
    Unmappable {
        encoding: Encoding,
        offset: usize,
        length: usize,
    },
}

impl CodingError {
    /// Encoding that reported the failure
    pub fn encoding(&self) -> Encoding {
        match self {
            CodingError::Malformed { encoding, .. } | CodingError::Unmappable { encoding, .. } => {
                *encoding
            }
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, CodingError::Malformed { .. })
    }

    pub fn is_unmappable(&self) -> bool {
        matches!(self, CodingError::Unmappable { .. })
    }
}

/// Error type for wide buffer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// A read or write asked for more code units than the buffer holds.
    #[error("length exceeds available space: requested {requested}, maximum is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error(transparent)]
    Coding(#[from] CodingError),

    /// Sub-view bounds do not fit inside the parent buffer.
    #[error("range {begin}..{end} out of bounds for buffer of {capacity} units")]
    OutOfRange {
        begin: usize,
        end: usize,
        capacity: usize,
    },

    /// A codec broke its own contract. This is a defect in the crate, never
    /// a property of the data being marshaled.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),

    #[error("failed to allocate {0} bytes of native memory")]
    AllocationFailed(usize),

    #[error("unsupported wide character width: {0} bytes")]
    UnsupportedWidth(usize),

    #[error("wide character width already fixed at {pinned} bytes, cannot use {requested}")]
    WidthMismatch { pinned: usize, requested: usize },
}

impl MarshalError {
    /// True for conditions that indicate a bug rather than bad input.
    ///
    /// Callers must abandon the operation; retrying cannot succeed and any
    /// partially written buffer content is meaningless.
    pub fn is_defect(&self) -> bool {
        matches!(self, MarshalError::InvariantViolation(_))
    }

    /// The coding failure, if this is one
    pub fn as_coding(&self) -> Option<&CodingError> {
        match self {
            MarshalError::Coding(e) => Some(e),
            _ => None,
        }
    }
}
