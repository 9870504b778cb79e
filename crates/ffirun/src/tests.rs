use ffipack::ByteBuffer;
use ffipack::Error as PackError;
use ffipack::ForeignAllocator;
use ffipack::ForeignBytes;
use ffipack::ViaFfi;

use crate::*;

type R<T> = Result<T>;

// ============================================================================
//  STATUS
// ============================================================================

#[test]
fn test_status_starts_successful() {
    let mut status = RustError::new();
    assert!(!status.is_err());
    assert_eq!(status.code(), RustError::SUCCESS);
    assert_eq!(status.take(), None);
}

#[test]
fn test_status_carries_code_and_message() {
    let mut status = RustError::default();
    status.set(42, "first");
    status.set(7, "second");
    assert!(status.is_err());
    assert_eq!(status.code(), 7);

    assert_eq!(status.take(), Some((7, "second".to_string())));
    assert!(!status.is_err());
    assert_eq!(status.take(), None);
}

#[test]
fn test_status_drops_interior_nul() {
    let mut status = RustError::new();
    status.set(3, "bad\0news");
    assert_eq!(status.take(), Some((3, "badnews".to_string())));
}

// ============================================================================
//  CALL AND EXPORT
// ============================================================================

#[test]
fn test_export_passes_value_through() {
    let mut status = RustError::new();
    let v: u32 = export(&mut status, || Ok(9));
    assert_eq!(v, 9);
    assert!(!status.is_err());
}

#[test]
fn test_export_reports_error_and_default() {
    let mut status = RustError::new();
    let v: i64 = export(&mut status, || Err(PackError::InvalidOptionTag(5).into()));
    assert_eq!(v, 0);
    assert_eq!(status.code(), RustError::MALFORMED);
    let (_, message) = status.take().unwrap();
    assert!(message.contains("invalid option tag"), "{}", message);

    let buf: ByteBuffer = export(&mut status, || Err(CallError::failed(11, "nope")));
    assert!(buf.is_null());
    assert_eq!(status.take(), Some((11, "call failed with code 11: nope".to_string())));
}

#[test]
fn test_call_lifts_on_success() -> R<()> {
    let alloc = ExternAllocator::scaffolding();
    let flag: bool = call(&alloc, |_| 1i8)?;
    assert!(flag);

    let value = vec!["a".to_string(), "b".to_string()];
    let lifted: Vec<String> = call(&alloc, |_| value.lower(&alloc))?;
    assert_eq!(lifted, value);
    Ok(())
}

#[test]
fn test_call_surfaces_failure_without_lifting() {
    let alloc = ExternAllocator::scaffolding();
    // An i8 of 9 would be a malformed bool if it were lifted.
    let result: R<bool> = call(&alloc, |status| {
        status.set(4, "callee gave up");
        9i8
    });
    assert_eq!(result, Err(CallError::failed(4, "callee gave up")));
}

#[test]
fn test_call_surfaces_malformed_return() {
    let alloc = ExternAllocator::scaffolding();
    let result: R<bool> = call(&alloc, |_| 9i8);
    assert_eq!(result, Err(CallError::Malformed(PackError::InvalidBool(9))));
    assert_eq!(result.unwrap_err().code(), RustError::MALFORMED);
}

#[test]
fn test_call_void() {
    assert_eq!(call_void(|_| ()), Ok(()));
    assert_eq!(
        call_void(|status| status.set(2, "full")),
        Err(CallError::failed(2, "full"))
    );
}

// ============================================================================
//  ENTRY POINTS
// ============================================================================

#[test]
fn test_entry_points_allocate_and_free() -> R<()> {
    let alloc = ExternAllocator::scaffolding();
    let buf = alloc.allocate_from_bytes(ForeignBytes::from_slice(b"abc"))?;
    assert_eq!(buf.as_slice(), b"abc");
    alloc.free(buf)?;

    let lifted = <String as ViaFfi<ByteBuffer>>::lift("xyz".to_string().lower(&alloc), &alloc)?;
    assert_eq!(lifted, "xyz");
    Ok(())
}

#[test]
fn test_entry_point_failure_becomes_alloc_error() {
    let alloc = ExternAllocator::scaffolding();
    let mut backing = [0u8; 4];
    // SAFETY: `backing` outlives the buffer, and the allocator refuses it
    // before touching the memory.
    let buf = unsafe { ByteBuffer::from_raw_parts(backing.as_mut_ptr(), 1, 4) };

    let err = alloc.free(buf).unwrap_err();
    assert_eq!(err.code, RustError::ALLOC);
    assert!(err.message.contains("differs from capacity"), "{}", err.message);
}
