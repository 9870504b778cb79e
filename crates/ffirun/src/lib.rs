//! # ffirun
//!
//! The runtime half of an `ffipack` boundary: the C entry points that
//! allocate and free buffers, the status out-parameter every call carries,
//! and the wrappers that lower arguments, check the status, and lift results.
//!
//! ## Caller
//!
//! ```ignore
//! let alloc = ExternAllocator::scaffolding();
//! let scaled: Vec<u64> = call(&alloc, |status| {
//!     scale(values.lower(&alloc), Some(3u64).lower(&alloc), status)
//! })?;
//! ```
//!
//! ## Callee
//!
//! ```ignore
//! extern "C" fn scale(values: ByteBuffer, factor: ByteBuffer, out_err: &mut RustError) -> ByteBuffer {
//!     let alloc = ExternAllocator::scaffolding();
//!     export(out_err, || {
//!         // Lift every argument before `?`, so each buffer is freed.
//!         let values = <Vec<u64>>::lift(values, &alloc);
//!         let factor = <Option<u64>>::lift(factor, &alloc);
//!         let (values, factor) = (values?, factor?.unwrap_or(1));
//!         Ok(values.iter().map(|v| v * factor).collect::<Vec<_>>().lower(&alloc))
//!     })
//! }
//! ```

pub mod call;
pub mod entry;
pub mod error;
pub mod extern_alloc;
pub mod status;

pub use call::call;
pub use call::call_void;
pub use call::export;

pub use entry::ffirun_rustbuffer_free;
pub use entry::ffirun_rustbuffer_from_bytes;
pub use entry::scaffolding;

pub use error::CallError;
pub use error::Result;

pub use extern_alloc::ExternAllocator;
pub use extern_alloc::FreeFn;
pub use extern_alloc::FromBytesFn;

pub use status::RustError;

#[cfg(test)]
mod tests;
