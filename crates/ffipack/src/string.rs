//! # Strings
//!
//! Inside a buffer every string is `[Len: u32][UTF-8 bytes]`. Two host shapes
//! feed that format:
//!
//! - `String`, already UTF-8, copied byte for byte.
//! - [`WideString`], UTF-16, transcoded on the way in and out.
//!
//! Lifted or lowered on its own, a string is the bare UTF-8 span with no
//! prefix. That transfer, including the UTF-16 conversion for `WideString`,
//! is handled here rather than by the generic buffer rule.

use std::any::type_name;

use crate::alloc::ForeignAllocator;
use crate::alloc::copy_to_foreign;
use crate::alloc::release;
use crate::buffer::ByteBuffer;
use crate::error::Error;
use crate::error::Result;
use crate::macros::fatal;
use crate::reader::Reader;
use crate::serialize::LEN_PREFIX;
use crate::serialize::Serializable;
use crate::via_ffi::ViaFfi;
use crate::writer::Writer;

/// Every UTF-16 code unit becomes at most three UTF-8 bytes.
const MAX_UTF8_PER_UNIT: usize = 3;

fn utf8_to_owned(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| Error::InvalidUtf8)
}

impl Serializable for String {
    fn size(&self) -> Option<usize> {
        self.len().checked_add(LEN_PREFIX)
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_raw_string(utf8_to_owned)
    }

    fn write_into(&self, writer: &mut Writer) {
        let bytes = self.as_bytes();
        writer.write_raw_string(bytes.len(), |span| {
            span.copy_from_slice(bytes);
            bytes.len()
        });
    }
}

impl ViaFfi<ByteBuffer> for String {
    fn lift<A: ForeignAllocator + ?Sized>(lowered: ByteBuffer, allocator: &A) -> Result<Self> {
        let lifted = utf8_to_owned(lowered.as_slice());
        release(allocator, lowered, type_name::<Self>());
        lifted
    }

    fn lower<A: ForeignAllocator + ?Sized>(&self, allocator: &A) -> ByteBuffer {
        copy_to_foreign(allocator, self.as_bytes(), "ViaFfi::lower")
    }
}

/// A UTF-16 string, as held by hosts whose native strings are wide.
///
/// Unpaired surrogates are not rejected; they encode as U+FFFD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString {
    units: Vec<u16>,
}

impl WideString {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self { units }
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<u16> {
        self.units.get(index).copied()
    }

    /// Truncates to empty, keeping the allocation.
    pub fn clear(&mut self) {
        self.units.clear();
    }

    pub fn push_str(&mut self, s: &str) {
        self.units.extend(s.encode_utf16());
    }

    /// Appends a UTF-8 span, transcoding it to UTF-16.
    ///
    /// # Errors
    /// Returns `Error::InvalidUtf8` and leaves the string untouched if the span
    /// is not valid UTF-8.
    pub fn push_utf8(&mut self, bytes: &[u8]) -> Result<()> {
        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
        self.push_str(s);
        Ok(())
    }

    /// Worst-case UTF-8 length: three bytes per code unit.
    pub fn estimated_utf8_len(&self) -> Option<usize> {
        self.units.len().checked_mul(MAX_UTF8_PER_UNIT)
    }

    /// Transcodes into `dst` and returns the number of bytes written.
    ///
    /// `dst` must hold at least `estimated_utf8_len()` bytes.
    pub fn encode_utf8_into(&self, dst: &mut [u8]) -> usize {
        let mut written = 0;
        for c in char::decode_utf16(self.units.iter().copied()) {
            let c = c.unwrap_or(char::REPLACEMENT_CHARACTER);
            let end = written + c.len_utf8();
            if end > dst.len() {
                fatal!(
                    "WideString::encode_utf8_into",
                    "destination of {} bytes cannot hold {} code units",
                    dst.len(),
                    self.units.len()
                );
            }
            c.encode_utf8(&mut dst[written..end]);
            written = end;
        }
        written
    }

    pub fn to_utf8(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self {
            units: s.encode_utf16().collect(),
        }
    }
}

impl std::fmt::Display for WideString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_utf8())
    }
}

impl Serializable for WideString {
    fn size(&self) -> Option<usize> {
        self.estimated_utf8_len()?.checked_add(LEN_PREFIX)
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_raw_string(|bytes| {
            let mut s = WideString::new();
            s.push_utf8(bytes)?;
            Ok(s)
        })
    }

    fn write_into(&self, writer: &mut Writer) {
        let hint = self.estimated_utf8_len().unwrap_or_else(|| {
            fatal!("WideString::write_into", "{} code units overflow the size estimate", self.len())
        });
        writer.write_raw_string(hint, |span| self.encode_utf8_into(span));
    }
}

impl ViaFfi<ByteBuffer> for WideString {
    fn lift<A: ForeignAllocator + ?Sized>(lowered: ByteBuffer, allocator: &A) -> Result<Self> {
        let mut lifted = WideString::new();
        let pushed = lifted.push_utf8(lowered.as_slice());
        release(allocator, lowered, type_name::<Self>());
        pushed.map(|()| lifted)
    }

    fn lower<A: ForeignAllocator + ?Sized>(&self, allocator: &A) -> ByteBuffer {
        let utf8 = self.to_utf8();
        copy_to_foreign(allocator, utf8.as_bytes(), "ViaFfi::lower")
    }
}
