//! # Serializable
//!
//! Per-type codecs for values that travel inside a byte buffer.
//!
//! Primitives come from the table in `macros`. Composites are written purely
//! in terms of their element codecs, so `Option<Vec<String>>` needs no code of
//! its own.

use crate::error::Error;
use crate::error::Result;
use crate::macros::for_each_primitive;
use crate::macros::impl_serializable_primitive;
use crate::reader::Reader;
use crate::writer::Writer;

/// Width of a `u32` length or count prefix.
pub(crate) const LEN_PREFIX: usize = 4;

/// A type that can be encoded into, and decoded from, a byte buffer.
pub trait Serializable: Sized {
    /// An upper bound on the encoded length, or `None` if computing it overflows.
    ///
    /// Exact for fixed-width types. Used to size the `Writer` before anything
    /// is written, so an encoding must never exceed it.
    fn size(&self) -> Option<usize>;

    /// Decodes a value, consuming exactly the bytes its encoding produced.
    ///
    /// # Errors
    /// Returns an `Error` when the bytes are in bounds but self-inconsistent.
    fn read_from(reader: &mut Reader<'_>) -> Result<Self>;

    /// Encodes the value.
    fn write_into(&self, writer: &mut Writer);
}

for_each_primitive!(impl_serializable_primitive);

impl Serializable for bool {
    fn size(&self) -> Option<usize> {
        Some(1)
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8() {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(Error::InvalidBool(b)),
        }
    }

    fn write_into(&self, writer: &mut Writer) {
        writer.write_u8(u8::from(*self));
    }
}

/// `[Tag: 0]` or `[Tag: 1][Value]`.
impl<T: Serializable> Serializable for Option<T> {
    fn size(&self) -> Option<usize> {
        match self {
            None => Some(1),
            Some(v) => v.size()?.checked_add(1),
        }
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8() {
            0 => Ok(None),
            1 => Ok(Some(T::read_from(reader)?)),
            tag => Err(Error::InvalidOptionTag(tag)),
        }
    }

    fn write_into(&self, writer: &mut Writer) {
        match self {
            None => writer.write_u8(0),
            Some(v) => {
                writer.write_u8(1);
                v.write_into(writer);
            }
        }
    }
}

/// `[Count: u32][Item]*`.
impl<T: Serializable> Serializable for Vec<T> {
    fn size(&self) -> Option<usize> {
        self.iter()
            .try_fold(LEN_PREFIX, |acc, item| acc.checked_add(item.size()?))
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u32() as usize;
        // Every encoding takes at least one byte, so the remaining length
        // bounds how many items can really follow.
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push(T::read_from(reader)?);
        }
        Ok(items)
    }

    fn write_into(&self, writer: &mut Writer) {
        writer.write_len(self.len());
        for item in self {
            item.write_into(writer);
        }
    }
}
