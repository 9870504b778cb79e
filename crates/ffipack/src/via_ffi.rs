//! # ViaFfi
//!
//! How a value crosses the boundary.
//!
//! - **Direct**: numeric primitives are their own foreign representation.
//!   `bool` travels as an `i8`, since not every calling convention marshals
//!   single-bit booleans reliably.
//! - **Buffer-mediated**: every [`BufferMediated`] type is lowered into a
//!   [`ByteBuffer`] through its [`Serializable`] codec and lifted back out of
//!   one. This is a single blanket impl; a new composite only needs a codec
//!   and the marker.
//!
//! Types with neither have no `ViaFfi` impl at all, so using one is a compile
//! error rather than a silent fallback.

use std::any::type_name;
use std::collections::BTreeMap;

use crate::alloc::ForeignAllocator;
use crate::alloc::release;
use crate::buffer::ByteBuffer;
use crate::error::Error;
use crate::error::Result;
use crate::macros::fatal;
use crate::macros::for_each_primitive;
use crate::macros::impl_via_ffi_direct;
use crate::reader::Reader;
use crate::record::Record;
use crate::serialize::Serializable;
use crate::writer::Writer;

/// A value that can be transferred over the boundary as `F`.
pub trait ViaFfi<F>: Sized {
    /// Converts a received foreign value into `Self`, taking ownership of it.
    ///
    /// # Errors
    /// Returns an `Error` when the foreign value is malformed. Any buffer
    /// behind it has been released either way.
    fn lift<A: ForeignAllocator + ?Sized>(lowered: F, allocator: &A) -> Result<Self>;

    /// Converts `self` into its foreign representation. The receiver owns the result.
    #[must_use]
    fn lower<A: ForeignAllocator + ?Sized>(&self, allocator: &A) -> F;
}

for_each_primitive!(impl_via_ffi_direct);

impl ViaFfi<i8> for bool {
    fn lift<A: ForeignAllocator + ?Sized>(lowered: i8, _: &A) -> Result<Self> {
        match lowered {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(Error::InvalidBool(b as u8)),
        }
    }

    fn lower<A: ForeignAllocator + ?Sized>(&self, _: &A) -> i8 {
        i8::from(*self)
    }
}

/// Marks a `Serializable` type as crossing the boundary inside a `ByteBuffer`.
pub trait BufferMediated: Serializable {}

impl<T: Serializable> BufferMediated for Option<T> {}
impl<T: Serializable> BufferMediated for Vec<T> {}
impl<K: Serializable, V: Serializable> BufferMediated for Record<K, V> {}
impl<K: Serializable + Ord, V: Serializable> BufferMediated for BTreeMap<K, V> {}

impl<T: BufferMediated> ViaFfi<ByteBuffer> for T {
    /// Decodes the whole buffer, then frees it.
    ///
    /// Bytes left over after a successful decode mean the two sides disagree
    /// about the type, which is fatal.
    fn lift<A: ForeignAllocator + ?Sized>(lowered: ByteBuffer, allocator: &A) -> Result<Self> {
        let ty = type_name::<T>();
        let lifted = {
            let mut reader = Reader::new(&lowered);
            let lifted = T::read_from(&mut reader);
            if lifted.is_ok() && reader.has_remaining() {
                fatal!(
                    "ViaFfi::lift",
                    "{} trailing bytes after decoding `{}`",
                    reader.remaining(),
                    ty
                );
            }
            lifted
        };
        tracing::trace!(ty, len = lowered.len(), ok = lifted.is_ok(), "lifted from byte buffer");
        release(allocator, lowered, ty);
        lifted
    }

    fn lower<A: ForeignAllocator + ?Sized>(&self, allocator: &A) -> ByteBuffer {
        let ty = type_name::<T>();
        let size = self
            .size()
            .unwrap_or_else(|| fatal!("ViaFfi::lower", "encoded size of `{}` overflows usize", ty));
        let mut writer = Writer::with_capacity(size);
        self.write_into(&mut writer);
        tracing::trace!(ty, size, written = writer.offset(), "lowered into byte buffer");
        writer.finish(allocator)
    }
}
