//! # Foreign Allocation
//!
//! The core needs exactly two things from whoever owns buffer memory: copy a
//! span into a new buffer, and release a buffer. [`ForeignAllocator`] is that
//! seam. [`HeapAllocator`] is the in-process implementation.

use std::ptr;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::buffer::ByteBuffer;
use crate::buffer::ForeignBytes;
use crate::error::AllocError;
use crate::macros::fatal;

/// The allocation and release entry points on the owning side of the boundary.
pub trait ForeignAllocator {
    /// Copies `bytes` into a newly allocated buffer.
    fn allocate_from_bytes(&self, bytes: ForeignBytes<'_>) -> Result<ByteBuffer, AllocError>;

    /// Releases a buffer previously returned by `allocate_from_bytes`.
    fn free(&self, buffer: ByteBuffer) -> Result<(), AllocError>;
}

/// Copies `bytes` across the boundary, aborting if the allocator refuses.
pub(crate) fn copy_to_foreign<A: ForeignAllocator + ?Sized>(
    allocator: &A,
    bytes: &[u8],
    op: &'static str,
) -> ByteBuffer {
    allocator
        .allocate_from_bytes(ForeignBytes::from_slice(bytes))
        .unwrap_or_else(|e| fatal!(op, "allocator rejected {} bytes: {}", bytes.len(), e))
}

/// Releases a lifted buffer, aborting if the allocator refuses.
///
/// A null buffer was never allocated and is not handed to the allocator.
pub(crate) fn release<A: ForeignAllocator + ?Sized>(allocator: &A, buffer: ByteBuffer, ty: &str) {
    if buffer.is_null() {
        return;
    }
    if let Err(e) = allocator.free(buffer) {
        fatal!("ViaFfi::lift", "failed to free buffer holding `{}`: {}", ty, e);
    }
}

/// Allocates buffers on the Rust heap.
///
/// Each buffer is a leaked boxed slice whose capacity equals its length;
/// `free` rebuilds the box and drops it. Outstanding buffers are counted so
/// leaks and double transfers show up in tests.
#[derive(Debug)]
pub struct HeapAllocator {
    max_len: usize,
    live: AtomicUsize,
}

impl HeapAllocator {
    pub const fn new() -> Self {
        Self {
            max_len: i32::MAX as usize,
            live: AtomicUsize::new(0),
        }
    }

    pub fn builder() -> HeapAllocatorBuilder {
        HeapAllocatorBuilder::new()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of buffers handed out and not yet freed.
    pub fn live_buffers(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ForeignAllocator for HeapAllocator {
    fn allocate_from_bytes(&self, bytes: ForeignBytes<'_>) -> Result<ByteBuffer, AllocError> {
        let src = bytes.as_slice();
        if src.len() > self.max_len {
            return Err(AllocError::new(
                AllocError::TOO_LARGE,
                format!("{} bytes exceeds the limit of {}", src.len(), self.max_len),
            ));
        }
        if src.is_empty() {
            return Ok(ByteBuffer::empty());
        }

        let len = src.len() as i32;
        let data = Box::into_raw(Box::<[u8]>::from(src)) as *mut u8;
        let live = self.live.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(len, live, "allocated byte buffer");

        // SAFETY: `data` is a fresh allocation of exactly `len` initialized bytes.
        Ok(unsafe { ByteBuffer::from_raw_parts(data, len, len) })
    }

    fn free(&self, buffer: ByteBuffer) -> Result<(), AllocError> {
        let (data, len, capacity) = buffer.into_raw_parts();
        if data.is_null() {
            return Ok(());
        }
        if len != capacity {
            return Err(AllocError::new(
                AllocError::NOT_OWNED,
                format!("len {} differs from capacity {}", len, capacity),
            ));
        }
        let Ok(before) = self
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| live.checked_sub(1))
        else {
            return Err(AllocError::new(
                AllocError::NOT_OWNED,
                "no buffers from this allocator are outstanding",
            ));
        };

        // SAFETY: every non-null buffer this allocator hands out is a boxed
        // slice of exactly `capacity` bytes, and ownership came back by value.
        drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, capacity as usize)) });
        tracing::debug!(len, live = before - 1, "freed byte buffer");
        Ok(())
    }
}

/// Fluent configuration for [`HeapAllocator`].
#[derive(Debug, Clone)]
pub struct HeapAllocatorBuilder {
    max_len: usize,
}

impl HeapAllocatorBuilder {
    pub fn new() -> Self {
        Self {
            max_len: i32::MAX as usize,
        }
    }

    /// Largest buffer the allocator accepts. Clamped to `i32::MAX`.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.min(i32::MAX as usize);
        self
    }

    pub fn build(self) -> HeapAllocator {
        HeapAllocator {
            max_len: self.max_len,
            live: AtomicUsize::new(0),
        }
    }
}

impl Default for HeapAllocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
