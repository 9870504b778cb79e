//! # ffipack
//!
//! A strict, bounds-checked codec for moving typed values across a
//! foreign-function boundary between two components that share neither a
//! memory model nor a type system.
//!
//! ## Transfer
//!
//! - **Direct**: fixed-width scalars pass as themselves (`bool` as an `i8`).
//! - **Buffer-mediated**: everything else is encoded into a [`ByteBuffer`] by a
//!   [`Writer`], handed over, decoded by a [`Reader`], and freed by the receiver.
//!
//! ## Format
//!
//! - **Primitives**: `[Data: N]`, big-endian. Booleans are one byte, 0 or 1.
//! - **Strings**: `[Len: u32][UTF-8: Len]`, no terminator.
//! - **Optionals**: `[Tag: 1b]` then the value if the tag is 1. Tag 0 is absent.
//! - **Sequences**: `[Count: u32][Item]*`.
//! - **Mappings**: `[Count: u32]([Key][Value])*`, in insertion order.
//!
//! There is no self-description: both sides must agree on the types.
//!
//! ## Failure
//!
//! Malformed-but-in-bounds payloads (a bad option tag, invalid UTF-8) come back
//! as an [`Error`]. Anything that would read or write out of bounds, overflow a
//! size, or leave a buffer half-consumed panics with a diagnostic; build with
//! `panic = "abort"` to make that terminate the process.

mod macros;

pub mod alloc;
pub mod buffer;
pub mod error;
pub mod reader;
pub mod record;
pub mod serialize;
pub mod string;
pub mod via_ffi;
pub mod writer;

pub use error::AllocError;
pub use error::Error;
pub use error::Result;

pub use buffer::ByteBuffer;
pub use buffer::ForeignBytes;

pub use alloc::ForeignAllocator;
pub use alloc::HeapAllocator;
pub use alloc::HeapAllocatorBuilder;

pub use reader::Reader;
pub use writer::Writer;

pub use serialize::Serializable;
pub use record::Record;
pub use string::WideString;

pub use via_ffi::BufferMediated;
pub use via_ffi::ViaFfi;
