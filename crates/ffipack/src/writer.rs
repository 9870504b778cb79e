use crate::alloc::ForeignAllocator;
use crate::alloc::copy_to_foreign;
use crate::buffer::ByteBuffer;
use crate::macros::fatal;
use crate::macros::for_each_primitive;
use crate::macros::writer_method;

/// A bounds-checked cursor over an owned, growable region.
///
/// The capacity is declared up front from a `size` computation. Each write
/// resizes the region to admit exactly the bytes it needs, and aborts if that
/// would pass the declared capacity: the size computation and the writes
/// disagreeing is a programming error, not a data condition.
#[derive(Debug)]
pub struct Writer {
    buf: Vec<u8>,
    capacity: usize,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes written so far.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Takes the written bytes without crossing the boundary.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    fn reserve(&mut self, width: usize, op: &'static str) -> usize {
        let start = self.buf.len();
        match start.checked_add(width) {
            Some(end) if end <= self.capacity => {
                self.buf.resize(end, 0);
                start
            }
            _ => fatal!(
                op,
                "writing {} bytes at offset {} overruns a capacity of {} bytes",
                width,
                start,
                self.capacity
            ),
        }
    }

    for_each_primitive!(writer_method);

    /// Writes a `u32` length or count prefix.
    pub fn write_len(&mut self, len: usize) {
        let len = u32::try_from(len)
            .unwrap_or_else(|_| fatal!("Writer::write_len", "{} does not fit in a u32 prefix", len));
        self.write_u32(len);
    }

    /// Writes a length-prefixed byte string whose final length is only known
    /// once it has been produced.
    ///
    /// Reserves the prefix plus `size_hint` bytes, the most `produce` may
    /// write. `produce` fills the span and returns how many bytes it actually
    /// wrote; that count is backpatched into the prefix and the unused tail of
    /// the reservation is reclaimed. A plain UTF-8 copy passes its exact
    /// length as the hint; a UTF-16 transcode passes three bytes per code unit.
    pub fn write_raw_string(&mut self, size_hint: usize, produce: impl FnOnce(&mut [u8]) -> usize) {
        let prefix = self.reserve(4, "Writer::write_raw_string");
        let body = self.reserve(size_hint, "Writer::write_raw_string");

        let written = produce(&mut self.buf[body..]);
        if written > size_hint {
            fatal!(
                "Writer::write_raw_string",
                "producer reported {} bytes into a span of {}",
                written,
                size_hint
            );
        }
        let len = u32::try_from(written).unwrap_or_else(|_| {
            fatal!("Writer::write_raw_string", "{} does not fit in a u32 prefix", written)
        });

        self.buf[prefix..body].copy_from_slice(&len.to_be_bytes());
        self.buf.truncate(body + written);
    }

    /// Hands the written bytes to the foreign allocator.
    pub fn finish<A: ForeignAllocator + ?Sized>(self, allocator: &A) -> ByteBuffer {
        copy_to_foreign(allocator, &self.buf, "Writer::finish")
    }
}
