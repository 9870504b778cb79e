//! The primitive table, and the one way out when the two sides disagree.

/// Defines every fixed-width primitive that crosses the boundary.
/// Arguments passed to callback:
/// 1. Rust type
/// 2. Width on the wire, in bytes
/// 3. `Reader` method name
/// 4. `Writer` method name
///
/// `bool` is not in the table: it rides on `u8` and has its own rules.
macro_rules! for_each_primitive {
    ($m:ident) => {
        $m!(u8,  1, read_u8,  write_u8);
        $m!(i8,  1, read_i8,  write_i8);
        $m!(u16, 2, read_u16, write_u16);
        $m!(i16, 2, read_i16, write_i16);
        $m!(u32, 4, read_u32, write_u32);
        $m!(i32, 4, read_i32, write_i32);
        $m!(u64, 8, read_u64, write_u64);
        $m!(i64, 8, read_i64, write_i64);
        $m!(f32, 4, read_f32, write_f32);
        $m!(f64, 8, read_f64, write_f64);
    };
}

/// Logs the violation and panics.
///
/// Every bounds, overflow, and allocator failure goes through here. The
/// release profile aborts on panic, so this ends the process.
macro_rules! fatal {
    ($op:expr, $($arg:tt)+) => {{
        let detail = format!($($arg)+);
        tracing::error!(op = $op, detail = %detail, "boundary invariant violated");
        panic!("{}: {}", $op, detail)
    }};
}

/// Generates a big-endian read on `Reader`.
macro_rules! reader_method {
    ($ty:ty, $width:literal, $read:ident, $write:ident) => {
        #[doc = concat!("Reads a big-endian `", stringify!($ty), "`, aborting if fewer than ", stringify!($width), " bytes remain.")]
        #[inline]
        pub fn $read(&mut self) -> $ty {
            let start = self.advance($width, concat!("Reader::", stringify!($read)));
            let mut raw = [0u8; $width];
            raw.copy_from_slice(&self.buf[start..start + $width]);
            <$ty>::from_be_bytes(raw)
        }
    };
}

/// Generates a big-endian write on `Writer`.
macro_rules! writer_method {
    ($ty:ty, $width:literal, $read:ident, $write:ident) => {
        #[doc = concat!("Writes a big-endian `", stringify!($ty), "`, aborting if it would pass the declared capacity.")]
        #[inline]
        pub fn $write(&mut self, v: $ty) {
            let start = self.reserve($width, concat!("Writer::", stringify!($write)));
            self.buf[start..start + $width].copy_from_slice(&v.to_be_bytes());
        }
    };
}

/// Generates the `Serializable` impl for a table entry.
macro_rules! impl_serializable_primitive {
    ($ty:ty, $width:literal, $read:ident, $write:ident) => {
        impl crate::serialize::Serializable for $ty {
            #[inline]
            fn size(&self) -> Option<usize> {
                Some($width)
            }

            #[inline]
            fn read_from(reader: &mut crate::reader::Reader<'_>) -> crate::error::Result<Self> {
                Ok(reader.$read())
            }

            #[inline]
            fn write_into(&self, writer: &mut crate::writer::Writer) {
                writer.$write(*self);
            }
        }
    };
}

/// Generates the direct `ViaFfi` impl for a table entry: the value is its own
/// foreign representation.
macro_rules! impl_via_ffi_direct {
    ($ty:ty, $width:literal, $read:ident, $write:ident) => {
        impl crate::via_ffi::ViaFfi<$ty> for $ty {
            #[inline]
            fn lift<A: crate::alloc::ForeignAllocator + ?Sized>(lowered: $ty, _: &A) -> crate::error::Result<Self> {
                Ok(lowered)
            }

            #[inline]
            fn lower<A: crate::alloc::ForeignAllocator + ?Sized>(&self, _: &A) -> $ty {
                *self
            }
        }
    };
}

pub(crate) use fatal;
pub(crate) use for_each_primitive;
pub(crate) use impl_serializable_primitive;
pub(crate) use impl_via_ffi_direct;
pub(crate) use reader_method;
pub(crate) use writer_method;
