//! Native memory blocks handed to the foreign engine

use std::ptr::NonNull;

use super::error::{MarshalError, MarshalResult};

/// A zeroed block from the C heap, freed on drop
#[derive(Debug)]
pub struct NativeMemory {
    ptr: NonNull<u8>,
    len: usize,
}

impl NativeMemory {
    /// Allocate `len` zeroed bytes. `len` must be non-zero.
    pub fn allocate(len: usize) -> MarshalResult<Self> {
        if len == 0 {
            return Err(MarshalError::AllocationFailed(0));
        }
        // Safety: calloc with a non-zero size either returns a valid block
        // or null, which NonNull::new rejects.
        let raw = unsafe { libc::calloc(len, 1) };
        let ptr = NonNull::new(raw.cast::<u8>()).ok_or(MarshalError::AllocationFailed(len))?;
        Ok(Self { ptr, len })
    }

    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// Safety: the block is plain C heap memory owned by exactly one value, with
// no thread-local state attached.
unsafe impl Send for NativeMemory {}

impl Drop for NativeMemory {
    fn drop(&mut self) {
        // Safety: ptr came from calloc and is freed exactly once.
        unsafe { libc::free(self.ptr.as_ptr().cast()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_zeroed() {
        let memory = NativeMemory::allocate(64).unwrap();
        assert_eq!(memory.len(), 64);
        assert!(!memory.is_empty());
        let bytes = unsafe { std::slice::from_raw_parts(memory.as_ptr().as_ptr(), memory.len()) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_length_rejected() {
        assert_eq!(
            NativeMemory::allocate(0).unwrap_err(),
            MarshalError::AllocationFailed(0)
        );
    }
}
