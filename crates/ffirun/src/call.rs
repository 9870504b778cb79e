//! # Calls
//!
//! Both ends of one foreign call.
//!
//! - [`call`] is the caller: it hands the callee a fresh status, checks it,
//!   and only then lifts the return value.
//! - [`export`] is the callee: it runs a body that lifts arguments and lowers
//!   a result, and turns any error into a status plus a default return value.

use ffipack::ForeignAllocator;
use ffipack::ViaFfi;

use crate::error::CallError;
use crate::error::Result;
use crate::status::RustError;

/// Invokes a foreign function and lifts what it returns.
///
/// `invoke` receives the status out-parameter; arguments are lowered inside
/// it so they are handed straight to the callee.
///
/// ```ignore
/// let names: Vec<String> = call(&alloc, |status| list_names(prefix.lower(&alloc), status))?;
/// ```
///
/// The return value of a failed call is a placeholder and is not lifted.
pub fn call<R, F, A>(allocator: &A, invoke: impl FnOnce(&mut RustError) -> F) -> Result<R>
where
    R: ViaFfi<F>,
    A: ForeignAllocator + ?Sized,
{
    let mut status = RustError::new();
    let lowered = invoke(&mut status);
    if let Some((code, message)) = status.take() {
        tracing::debug!(code, %message, "foreign call reported failure");
        return Err(CallError::Failed { code, message });
    }
    R::lift(lowered, allocator).map_err(|e| {
        tracing::warn!(error = %e, "foreign call returned a malformed value");
        CallError::from(e)
    })
}

/// Invokes a foreign function that returns nothing.
pub fn call_void(invoke: impl FnOnce(&mut RustError)) -> Result<()> {
    let mut status = RustError::new();
    invoke(&mut status);
    match status.take() {
        Some((code, message)) => {
            tracing::debug!(code, %message, "foreign call reported failure");
            Err(CallError::Failed { code, message })
        }
        None => Ok(()),
    }
}

/// Runs the body of an exported function.
///
/// On error the status is set and `F::default()` is returned in place of a
/// value; the caller must not look at it.
///
/// Every argument buffer belongs to the callee, so the body must lift all of
/// them before applying `?` to any. Returning early from the first failed
/// lift leaks the buffers after it.
///
/// ```ignore
/// export(out_err, || {
///     let name = String::lift(name, &alloc);
///     let tags = <Vec<String>>::lift(tags, &alloc);
///     let (name, tags) = (name?, tags?);
///     Ok(label(&name, &tags).lower(&alloc))
/// })
/// ```
pub fn export<F: Default>(out_err: &mut RustError, body: impl FnOnce() -> Result<F>) -> F {
    match body() {
        Ok(lowered) => lowered,
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "exported call failed");
            out_err.set(e.code(), e.to_string());
            F::default()
        }
    }
}
