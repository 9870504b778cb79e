use ffipack::AllocError;
use ffipack::ByteBuffer;
use ffipack::ForeignAllocator;
use ffipack::ForeignBytes;

use crate::entry;
use crate::status::RustError;

/// `ffirun_rustbuffer_from_bytes` and anything with the same signature.
pub type FromBytesFn = for<'a> unsafe extern "C" fn(ForeignBytes<'a>, &mut RustError) -> ByteBuffer;

/// `ffirun_rustbuffer_free` and anything with the same signature.
pub type FreeFn = unsafe extern "C" fn(ByteBuffer, &mut RustError);

/// A [`ForeignAllocator`] reached through a pair of C entry points.
///
/// A non-zero status from either entry point comes back as an `AllocError`
/// carrying the same code and message.
#[derive(Debug, Clone, Copy)]
pub struct ExternAllocator {
    from_bytes: FromBytesFn,
    free: FreeFn,
}

impl ExternAllocator {
    /// # Safety
    ///
    /// `from_bytes` must return a buffer that `free` accepts, and both must
    /// honor the `ByteBuffer` layout and the status contract.
    pub const unsafe fn new(from_bytes: FromBytesFn, free: FreeFn) -> Self {
        Self { from_bytes, free }
    }

    /// The entry points exported by this crate.
    pub fn scaffolding() -> Self {
        Self {
            from_bytes: entry::ffirun_rustbuffer_from_bytes,
            free: entry::ffirun_rustbuffer_free,
        }
    }
}

fn check(mut status: RustError) -> Result<(), AllocError> {
    match status.take() {
        Some((code, message)) => Err(AllocError::new(code, message)),
        None => Ok(()),
    }
}

impl ForeignAllocator for ExternAllocator {
    fn allocate_from_bytes(&self, bytes: ForeignBytes<'_>) -> Result<ByteBuffer, AllocError> {
        let mut status = RustError::new();
        // SAFETY: upheld by the constructor's contract.
        let buf = unsafe { (self.from_bytes)(bytes, &mut status) };
        check(status).map(|()| buf)
    }

    fn free(&self, buffer: ByteBuffer) -> Result<(), AllocError> {
        let mut status = RustError::new();
        // SAFETY: upheld by the constructor's contract.
        unsafe { (self.free)(buffer, &mut status) };
        check(status)
    }
}
