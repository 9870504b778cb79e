//! End-to-end calls through `extern "C"` functions.
//!
//! The callees below stand in for a foreign component. They share one
//! allocator with the caller through a pair of entry points backed by a
//! per-thread `HeapAllocator`, so each test sees only its own buffers.

use std::collections::BTreeMap;

use ffipack::ByteBuffer;
use ffipack::ForeignAllocator;
use ffipack::ForeignBytes;
use ffipack::HeapAllocator;
use ffipack::Record;
use ffipack::ViaFfi;
use ffipack::WideString;

use ffirun::CallError;
use ffirun::ExternAllocator;
use ffirun::RustError;
use ffirun::call;
use ffirun::call_void;
use ffirun::export;

thread_local! {
    static HEAP: HeapAllocator = const { HeapAllocator::new() };
}

// --- Entry points ---

extern "C" fn test_from_bytes(bytes: ForeignBytes<'_>, out_err: &mut RustError) -> ByteBuffer {
    export(out_err, || HEAP.with(|heap| Ok(heap.allocate_from_bytes(bytes)?)))
}

extern "C" fn test_free(buf: ByteBuffer, out_err: &mut RustError) {
    export(out_err, || HEAP.with(|heap| Ok(heap.free(buf)?)))
}

fn alloc() -> ExternAllocator {
    // SAFETY: both entry points share the thread's heap.
    unsafe { ExternAllocator::new(test_from_bytes, test_free) }
}

fn live_buffers() -> usize {
    HEAP.with(|heap| heap.live_buffers())
}

// --- Callees ---

/// `greet(name: WideString, times: Option<u8>) -> Vec<String>`
extern "C" fn greet(name: ByteBuffer, times: ByteBuffer, out_err: &mut RustError) -> ByteBuffer {
    let alloc = alloc();
    export(out_err, || {
        let name = WideString::lift(name, &alloc);
        let times = <Option<u8>>::lift(times, &alloc);
        let (name, times) = (name?, times?.unwrap_or(1));
        let greetings: Vec<String> = (0..times).map(|i| format!("hello #{} {}", i, name)).collect();
        Ok(greetings.lower(&alloc))
    })
}

/// `checked_div(a: i32, b: i32) -> i32`, failing with code 7 on zero.
extern "C" fn checked_div(a: i32, b: i32, out_err: &mut RustError) -> i32 {
    export(out_err, || match b {
        0 => Err(CallError::failed(7, "division by zero")),
        _ => Ok(a / b),
    })
}

/// `is_even(n: u64) -> bool`
extern "C" fn is_even(n: u64, out_err: &mut RustError) -> i8 {
    let alloc = alloc();
    export(out_err, || Ok((n % 2 == 0).lower(&alloc)))
}

/// `tally(words: Vec<String>) -> Record<String, u32>`, in first-seen order.
extern "C" fn tally(words: ByteBuffer, out_err: &mut RustError) -> ByteBuffer {
    let alloc = alloc();
    export(out_err, || {
        let words = <Vec<String>>::lift(words, &alloc)?;
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        let mut order = Vec::new();
        for w in &words {
            let n = counts.entry(w.as_str()).or_insert(0);
            if *n == 0 {
                order.push(w.as_str());
            }
            *n += 1;
        }
        let record: Record<String, u32> = order.into_iter().map(|w| (w.to_string(), counts[w])).collect();
        Ok(record.lower(&alloc))
    })
}

/// Returns a buffer holding an optional with a tag of 2.
extern "C" fn bad_optional(out_err: &mut RustError) -> ByteBuffer {
    let alloc = alloc();
    export(out_err, || Ok(alloc.allocate_from_bytes(ForeignBytes::from_slice(&[2]))?))
}

/// `reset()`, always failing.
extern "C" fn reset(out_err: &mut RustError) {
    export(out_err, || Err(CallError::failed(9, "read-only")))
}

// --- Tests ---

#[test]
fn test_buffers_cross_both_ways() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let alloc = alloc();
    let name = WideString::from("wörld");

    let greetings: Vec<String> = call(&alloc, |status| {
        greet(name.lower(&alloc), Some(2u8).lower(&alloc), status)
    })?;
    assert_eq!(greetings, ["hello #0 wörld", "hello #1 wörld"]);
    assert_eq!(live_buffers(), 0);
    Ok(())
}

#[test]
fn test_direct_values_cross() -> anyhow::Result<()> {
    let alloc = alloc();
    let q: i32 = call(&alloc, |status| checked_div(-9, 2, status))?;
    assert_eq!(q, -4);

    let even: bool = call(&alloc, |status| is_even(10, status))?;
    let odd: bool = call(&alloc, |status| is_even(7, status))?;
    assert!(even && !odd);
    Ok(())
}

#[test]
fn test_callee_failure_is_reported() {
    let alloc = alloc();
    let result: ffirun::Result<i32> = call(&alloc, |status| checked_div(1, 0, status));
    match result {
        Err(CallError::Failed { code, message }) => {
            assert_eq!(code, 7);
            assert!(message.contains("division by zero"), "{}", message);
        }
        other => panic!("expected a failure, got {:?}", other),
    }

    let err = call_void(|status| reset(status)).unwrap_err();
    assert_eq!(err.code(), 9);
}

#[test]
fn test_mappings_keep_order() -> anyhow::Result<()> {
    let alloc = alloc();
    let words: Vec<String> = ["b", "a", "b", "c", "a", "b"].map(String::from).to_vec();

    let counts: Record<String, u32> = call(&alloc, |status| tally(words.lower(&alloc), status))?;
    let pairs: Vec<(&str, u32)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(pairs, [("b", 3), ("a", 2), ("c", 1)]);
    assert_eq!(live_buffers(), 0);
    Ok(())
}

#[test]
fn test_malformed_argument_reaches_caller_as_status() {
    let alloc = alloc();
    let bogus = alloc
        .allocate_from_bytes(ForeignBytes::from_slice(&[7]))
        .expect("allocation failed");

    let result: ffirun::Result<Vec<String>> =
        call(&alloc, |status| greet(WideString::from("x").lower(&alloc), bogus, status));
    let err = result.unwrap_err();
    assert_eq!(err.code(), RustError::MALFORMED);
    assert!(err.to_string().contains("invalid option tag"), "{}", err);
    assert_eq!(live_buffers(), 0);
}

#[test]
fn test_malformed_return_is_freed() {
    let alloc = alloc();
    let result: ffirun::Result<Option<u8>> = call(&alloc, |status| bad_optional(status));
    assert_eq!(
        result,
        Err(CallError::Malformed(ffipack::Error::InvalidOptionTag(2)))
    );
    assert_eq!(live_buffers(), 0);
}

#[test]
fn test_scaffolding_entry_points() -> anyhow::Result<()> {
    let alloc = ExternAllocator::scaffolding();
    let value = Some(vec![1.5f64, -2.0]);
    let lowered = value.lower(&alloc);
    assert_eq!(lowered.len(), 1 + 4 + 16);
    assert_eq!(<Option<Vec<f64>>>::lift(lowered, &alloc)?, value);
    Ok(())
}

#[test]
fn test_malformed_first_argument_frees_the_rest() {
    let alloc = alloc();
    let bogus = alloc
        .allocate_from_bytes(ForeignBytes::from_slice(&[0xff]))
        .expect("allocation failed");

    let result: ffirun::Result<Vec<String>> =
        call(&alloc, |status| greet(bogus, Some(2u8).lower(&alloc), status));
    let err = result.unwrap_err();
    assert_eq!(err.code(), RustError::MALFORMED);
    assert!(err.to_string().contains("not valid UTF-8"), "{}", err);
    assert_eq!(live_buffers(), 0);
}
