//! Wide Character Width
//!
//! Determines how many bytes one code unit of the foreign buffer occupies.

use std::fmt;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::error::{MarshalError, MarshalResult};

/// Word size of one native wide character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WideCharWidth {
    /// 2-byte units, carried as UTF-16LE
    Two,
    /// 4-byte units, carried as UTF-32LE
    Four,
}

impl WideCharWidth {
    /// Width of the platform's `wchar_t`.
    ///
    /// Evaluated at compile time: a target whose `wchar_t` is neither 2 nor
    /// 4 bytes wide does not build.
    pub const NATIVE: WideCharWidth = match std::mem::size_of::<libc::wchar_t>() {
        2 => WideCharWidth::Two,
        4 => WideCharWidth::Four,
        _ => panic!("wchar_t must be 2 or 4 bytes wide"),
    };

    /// Size in bytes of one code unit
    pub const fn bytes(self) -> usize {
        match self {
            WideCharWidth::Two => 2,
            WideCharWidth::Four => 4,
        }
    }

    /// Parse a byte count reported by the platform or the foreign engine
    pub fn from_bytes(bytes: usize) -> MarshalResult<Self> {
        match bytes {
            2 => Ok(WideCharWidth::Two),
            4 => Ok(WideCharWidth::Four),
            other => Err(MarshalError::UnsupportedWidth(other)),
        }
    }
}

impl fmt::Display for WideCharWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bytes() * 8)
    }
}

static PROCESS_WIDTH: OnceCell<WideCharWidth> = OnceCell::new();

/// Width used by every buffer in this process.
///
/// Fixed on first call: either the value given to [`pin`] beforehand, or
/// [`WideCharWidth::NATIVE`].
pub fn current() -> WideCharWidth {
    *PROCESS_WIDTH.get_or_init(|| WideCharWidth::NATIVE)
}

/// Fix the process width before any buffer is created.
///
/// Used when the foreign engine was built with a `widechar` that differs
/// from `wchar_t`. Pinning the width that is already in effect is a no-op.
pub fn pin(width: WideCharWidth) -> MarshalResult<()> {
    let pinned = *PROCESS_WIDTH.get_or_init(|| {
        debug!(%width, "pinning wide character width");
        width
    });
    if pinned == width {
        Ok(())
    } else {
        Err(MarshalError::WidthMismatch {
            pinned: pinned.bytes(),
            requested: width.bytes(),
        })
    }
}
