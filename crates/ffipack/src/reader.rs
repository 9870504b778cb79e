use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::macros::fatal;
use crate::macros::for_each_primitive;
use crate::macros::reader_method;

/// A bounds-checked cursor over a borrowed buffer.
///
/// Every read computes its end offset before touching memory. An overrun is
/// never a data error: it means the two sides disagree about the layout, so
/// it aborts instead of returning.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader at the start of a buffer received over the boundary.
    pub fn new(buffer: &'a ByteBuffer) -> Self {
        Self::from_slice(buffer.as_slice())
    }

    /// Create a reader over local bytes.
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// True until every byte has been consumed.
    pub fn has_remaining(&self) -> bool {
        self.offset < self.buf.len()
    }

    #[inline]
    fn advance(&mut self, width: usize, op: &'static str) -> usize {
        let start = self.offset;
        match start.checked_add(width) {
            Some(end) if end <= self.buf.len() => {
                self.offset = end;
                start
            }
            _ => fatal!(
                op,
                "reading {} bytes at offset {} overruns a buffer of {} bytes",
                width,
                start,
                self.buf.len()
            ),
        }
    }

    for_each_primitive!(reader_method);

    /// Reads a `u32` length followed by that many bytes, and hands the bytes
    /// to `convert`.
    ///
    /// The span only lives for the duration of the call: the buffer behind it
    /// is usually freed right after decoding, so `convert` must copy what it
    /// needs into an owned value.
    pub fn read_raw_string<T>(&mut self, convert: impl FnOnce(&[u8]) -> Result<T>) -> Result<T> {
        let len = self.read_u32() as usize;
        let start = self.advance(len, "Reader::read_raw_string");
        convert(&self.buf[start..start + len])
    }
}
