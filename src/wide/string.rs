//! Wide String
//!
//! Fixed-capacity buffer of native wide characters, laid out exactly as the
//! foreign engine expects: contiguous little-endian code units, no padding,
//! no terminator.

use std::fmt;
use std::ptr::NonNull;
use std::str::FromStr;

use once_cell::unsync::OnceCell;
use tracing::trace;

use super::error::{MarshalError, MarshalResult};
use super::memory::NativeMemory;
use super::registry::{registry, CodecRegistry, EncodingFamily};
use super::width::WideCharWidth;

/// A fixed-capacity wide character buffer.
///
/// Capacity is counted in code units and never changes. Backing memory is
/// allocated on first read, write or [`pointer`](Self::pointer) call, sized
/// `capacity * width` bytes, and reused until the buffer is dropped.
///
/// An owned buffer may be moved to another thread but not shared between
/// threads. Writes take `&self` because [`WideStringView`]s alias the same
/// memory.
pub struct WideString {
    capacity: usize,
    codecs: &'static CodecRegistry,
    memory: OnceCell<NativeMemory>,
}

/// A window of units inside a [`WideString`], sharing its memory.
///
/// The borrow keeps the buffer alive for as long as the view exists. Writing
/// through either side is visible through the other. Views of views address
/// the same root buffer, so none of them can leave its thread.
pub struct WideStringView<'a> {
    root: &'a WideString,
    offset: usize,
    capacity: usize,
}

impl WideString {
    /// An empty buffer of `capacity` code units. No memory is allocated yet.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            codecs: registry(),
            memory: OnceCell::new(),
        }
    }

    /// A buffer sized to hold exactly `text`, with `text` written into it.
    pub fn from_text(text: &str) -> MarshalResult<Self> {
        let codecs = registry();
        let units = codecs.encoding(EncodingFamily::NativeText).units_for(text);
        let buffer = Self {
            capacity: units,
            codecs,
            memory: OnceCell::new(),
        };
        buffer.write(text)?;
        Ok(buffer)
    }

    /// Capacity in code units
    pub fn len(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    pub fn width(&self) -> WideCharWidth {
        self.codecs.width()
    }

    /// Size of the backing region in bytes
    pub fn byte_len(&self) -> usize {
        self.capacity.saturating_mul(self.width().bytes())
    }

    /// Whether the backing memory exists yet
    pub fn is_allocated(&self) -> bool {
        self.memory.get().is_some()
    }

    /// Address of the first code unit, allocating the backing memory if
    /// needed. This is what gets handed to the foreign engine.
    ///
    /// A zero-capacity buffer never allocates and yields a dangling,
    /// well-aligned pointer that must not be dereferenced.
    pub fn pointer(&self) -> MarshalResult<NonNull<u8>> {
        if self.capacity == 0 {
            return Ok(NonNull::<u32>::dangling().cast());
        }
        let memory = self.memory.get_or_try_init(|| {
            let bytes = self
                .capacity
                .checked_mul(self.width().bytes())
                .ok_or(MarshalError::AllocationFailed(usize::MAX))?;
            trace!(bytes, "allocating wide string memory");
            NativeMemory::allocate(bytes)
        })?;
        Ok(memory.as_ptr())
    }

    /// Read the first `length` code units as native text
    pub fn read(&self, length: usize) -> MarshalResult<String> {
        self.as_view().read(length)
    }

    /// Read the first `length` code units as braille cells
    pub fn read_dots(&self, length: usize) -> MarshalResult<String> {
        self.as_view().read_dots(length)
    }

    /// Write `text` as native text starting at the first code unit.
    ///
    /// Only the units `text` occupies are overwritten; the rest of the
    /// buffer keeps its previous content.
    pub fn write(&self, text: &str) -> MarshalResult<&Self> {
        self.as_view().write(text)?;
        Ok(self)
    }

    /// Write braille-pattern characters as cells. Anything outside
    /// U+2800..=U+28FF is an unmappable-character error.
    pub fn write_dots(&self, text: &str) -> MarshalResult<&Self> {
        self.as_view().write_dots(text)?;
        Ok(self)
    }

    /// The whole buffer as native text
    pub fn to_text(&self) -> MarshalResult<String> {
        self.read(self.capacity)
    }

    /// Copy of the raw backing bytes
    pub fn to_bytes(&self) -> MarshalResult<Vec<u8>> {
        self.as_view().to_bytes()
    }

    /// A view over the whole buffer
    pub fn as_view(&self) -> WideStringView<'_> {
        WideStringView {
            root: self,
            offset: 0,
            capacity: self.capacity,
        }
    }

    /// A view of units `begin..end` sharing this buffer's memory
    pub fn subview(&self, begin: usize, end: usize) -> MarshalResult<WideStringView<'_>> {
        self.as_view().subview(begin, end)
    }

    /// A view from `begin` to the end of this buffer
    pub fn subview_from(&self, begin: usize) -> MarshalResult<WideStringView<'_>> {
        self.subview(begin, self.capacity)
    }
}

impl<'a> WideStringView<'a> {
    /// Capacity in code units
    pub fn len(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Position of the first unit inside the root buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> WideCharWidth {
        self.root.width()
    }

    /// Size of the addressed region in bytes
    pub fn byte_len(&self) -> usize {
        self.capacity.saturating_mul(self.width().bytes())
    }

    pub fn is_allocated(&self) -> bool {
        self.root.is_allocated()
    }

    /// Address of the view's first code unit. Allocates the root buffer's
    /// memory if needed.
    pub fn pointer(&self) -> MarshalResult<NonNull<u8>> {
        let base = self.root.pointer()?;
        // Safety: offset + capacity <= root capacity was checked when the
        // view was made, so the result is inside (or one past) the block.
        let ptr = unsafe { base.as_ptr().add(self.offset * self.width().bytes()) };
        NonNull::new(ptr).ok_or(MarshalError::InvariantViolation("view address is null"))
    }

    pub fn read(&self, length: usize) -> MarshalResult<String> {
        self.read_as(EncodingFamily::NativeText, length)
    }

    pub fn read_dots(&self, length: usize) -> MarshalResult<String> {
        self.read_as(EncodingFamily::Dots, length)
    }

    pub fn write(&self, text: &str) -> MarshalResult<&Self> {
        self.write_as(EncodingFamily::NativeText, text)
    }

    pub fn write_dots(&self, text: &str) -> MarshalResult<&Self> {
        self.write_as(EncodingFamily::Dots, text)
    }

    pub fn to_text(&self) -> MarshalResult<String> {
        self.read(self.capacity)
    }

    pub fn to_bytes(&self) -> MarshalResult<Vec<u8>> {
        if self.capacity == 0 {
            return Ok(Vec::new());
        }
        Ok(self.bytes(self.capacity)?.to_vec())
    }

    /// A narrower view of units `begin..end`, relative to this view
    pub fn subview(&self, begin: usize, end: usize) -> MarshalResult<WideStringView<'a>> {
        if begin > end || end > self.capacity {
            return Err(MarshalError::OutOfRange {
                begin,
                end,
                capacity: self.capacity,
            });
        }
        let offset = self
            .offset
            .checked_add(begin)
            .ok_or(MarshalError::InvariantViolation("view offset overflow"))?;
        Ok(WideStringView {
            root: self.root,
            offset,
            capacity: end - begin,
        })
    }

    pub fn subview_from(&self, begin: usize) -> MarshalResult<WideStringView<'a>> {
        self.subview(begin, self.capacity)
    }

    fn check_capacity(&self, requested: usize) -> MarshalResult<()> {
        if requested > self.capacity {
            return Err(MarshalError::CapacityExceeded {
                requested,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Borrow the first `units` code units of backing memory.
    fn bytes(&self, units: usize) -> MarshalResult<&[u8]> {
        let ptr = self.pointer()?;
        // Safety: units <= capacity, so the range lies inside the allocation,
        // which lives at least as long as the root buffer. Callers hold the
        // slice only for one decode or copy, during which nothing writes to
        // the block.
        Ok(unsafe { std::slice::from_raw_parts(ptr.as_ptr(), units * self.width().bytes()) })
    }

    fn read_as(&self, family: EncodingFamily, length: usize) -> MarshalResult<String> {
        self.check_capacity(length)?;
        if length == 0 {
            return Ok(String::new());
        }
        let bytes = self.bytes(length)?;
        trace!(length, ?family, "reading wide string");
        self.root.codecs.decode(family, bytes, length)
    }

    fn write_as(&self, family: EncodingFamily, text: &str) -> MarshalResult<&Self> {
        let codecs = self.root.codecs;
        let units = codecs.encoding(family).units_for(text);
        self.check_capacity(units)?;
        if units == 0 {
            return Ok(self);
        }
        let encoded = codecs.encode(family, text, units)?;
        let ptr = self.pointer()?;
        trace!(units, ?family, "writing wide string");
        // Safety: encoded.len() == units * width <= byte_len, and `encoded`
        // is a separate heap block so the ranges cannot overlap.
        unsafe { std::ptr::copy_nonoverlapping(encoded.as_ptr(), ptr.as_ptr(), encoded.len()) };
        Ok(self)
    }
}

impl FromStr for WideString {
    type Err = MarshalError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_text(text)
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WideString")
            .field("capacity", &self.capacity)
            .field("width", &self.width())
            .field("allocated", &self.is_allocated())
            .finish()
    }
}

impl fmt::Debug for WideStringView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WideStringView")
            .field("offset", &self.offset)
            .field("capacity", &self.capacity)
            .field("width", &self.width())
            .finish()
    }
}
