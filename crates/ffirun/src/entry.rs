//! # Entry Points
//!
//! The two C functions through which the other side of the boundary
//! allocates and releases buffers owned by this side.

use ffipack::ByteBuffer;
use ffipack::ForeignAllocator;
use ffipack::ForeignBytes;
use ffipack::HeapAllocator;

use crate::call::export;
use crate::status::RustError;

static SCAFFOLDING: HeapAllocator = HeapAllocator::new();

/// The allocator behind both entry points.
pub fn scaffolding() -> &'static HeapAllocator {
    &SCAFFOLDING
}

/// Copies `bytes` into a new buffer owned by this side.
#[unsafe(no_mangle)]
pub extern "C" fn ffirun_rustbuffer_from_bytes(bytes: ForeignBytes<'_>, out_err: &mut RustError) -> ByteBuffer {
    export(out_err, || Ok(SCAFFOLDING.allocate_from_bytes(bytes)?))
}

/// Releases a buffer produced by `ffirun_rustbuffer_from_bytes`.
#[unsafe(no_mangle)]
pub extern "C" fn ffirun_rustbuffer_free(buf: ByteBuffer, out_err: &mut RustError) {
    export(out_err, || Ok(SCAFFOLDING.free(buf)?))
}
