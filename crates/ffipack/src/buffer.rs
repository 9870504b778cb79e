//! # Byte Buffers
//!
//! The two C-layout structs that carry bytes over the boundary.
//!
//! - [`ByteBuffer`]: an owned region handed from one side to the other.
//! - [`ForeignBytes`]: a borrowed span handed to the allocation entry point.

use std::marker::PhantomData;
use std::ptr;
use std::slice;

use crate::macros::fatal;

/// An owned byte region that crosses the boundary.
///
/// Whoever receives a `ByteBuffer` owns it and must release it exactly once
/// through the allocator that produced it. The type is neither `Clone` nor
/// `Copy`, and both release and lift take it by value.
///
/// # Layout
///
/// `{ capacity: i32, len: i32, data: *mut u8 }`, in that order.
#[repr(C)]
#[derive(Debug)]
#[must_use = "a ByteBuffer leaks unless it is lifted or freed"]
pub struct ByteBuffer {
    capacity: i32,
    len: i32,
    data: *mut u8,
}

impl ByteBuffer {
    /// A buffer with no backing allocation.
    pub const fn empty() -> Self {
        Self {
            capacity: 0,
            len: 0,
            data: ptr::null_mut(),
        }
    }

    /// Assembles a buffer from its parts, aborting if the parts are inconsistent.
    ///
    /// # Safety
    ///
    /// `data` must point to an allocation of `capacity` bytes whose first `len`
    /// bytes are initialized, and that allocation must stay valid until the
    /// buffer is released.
    pub unsafe fn from_raw_parts(data: *mut u8, len: i32, capacity: i32) -> Self {
        let buffer = Self { capacity, len, data };
        buffer.check("ByteBuffer::from_raw_parts");
        buffer
    }

    /// Disassembles the buffer. The caller takes over the release obligation.
    pub fn into_raw_parts(self) -> (*mut u8, i32, i32) {
        (self.data, self.len, self.capacity)
    }

    pub fn len(&self) -> usize {
        self.check("ByteBuffer::len");
        self.len as usize
    }

    pub fn capacity(&self) -> usize {
        self.check("ByteBuffer::capacity");
        self.capacity as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when there is no backing allocation at all.
    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// Views the initialized bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.check("ByteBuffer::as_slice");
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: `check` upheld len <= capacity and non-null data; the
        // allocation is owned by `self` and outlives the borrow.
        unsafe { slice::from_raw_parts(self.data, self.len as usize) }
    }

    // Buffers returned by a foreign call never pass through `from_raw_parts`,
    // so the layout is re-validated before every access.
    fn check(&self, op: &'static str) {
        if self.len < 0 || self.capacity < 0 || self.len > self.capacity {
            fatal!(op, "len {} and capacity {} are inconsistent", self.len, self.capacity);
        }
        if self.data.is_null() && self.len > 0 {
            fatal!(op, "null data with len {}", self.len);
        }
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

/// A borrowed byte span passed to the foreign allocator, which copies it.
///
/// # Layout
///
/// `{ len: i32, data: *const u8 }`, in that order.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ForeignBytes<'a> {
    len: i32,
    data: *const u8,
    _marker: PhantomData<&'a [u8]>,
}

/// Length field of a span, aborting above `i32::MAX`.
pub(crate) fn span_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or_else(|_| {
        fatal!("ForeignBytes::from_slice", "{} bytes does not fit in an i32 length", len)
    })
}

impl<'a> ForeignBytes<'a> {
    /// Borrows `bytes`, aborting if the span is longer than `i32::MAX`.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self {
            len: span_len(bytes.len()),
            data: bytes.as_ptr(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len <= 0
    }

    pub fn as_slice(&self) -> &'a [u8] {
        if self.len < 0 || (self.data.is_null() && self.len > 0) {
            fatal!("ForeignBytes::as_slice", "invalid span: len {}, null data {}", self.len, self.data.is_null());
        }
        if self.len == 0 {
            return &[];
        }
        // SAFETY: the span was either built from a live `&'a [u8]` or handed
        // over by a caller bound to the same contract.
        unsafe { slice::from_raw_parts(self.data, self.len as usize) }
    }
}
