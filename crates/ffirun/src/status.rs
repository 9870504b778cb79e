//! # Call Status
//!
//! Every foreign function takes a `RustError` out-parameter as its last
//! argument. The caller zeroes it, the callee writes a non-zero code and a
//! message on failure, and the caller inspects it before touching the
//! return value.

use std::ffi::CString;
use std::ffi::c_char;
use std::ptr;

/// The status out-parameter of a foreign call.
///
/// # Layout
///
/// `{ code: i32, message: *mut c_char }`, in that order. `code == 0` is
/// success. On failure `message` is either null or an owned, NUL-terminated
/// string that this struct releases.
#[repr(C)]
#[derive(Debug)]
pub struct RustError {
    code: i32,
    message: *mut c_char,
}

impl RustError {
    pub const SUCCESS: i32 = 0;
    /// An argument or return value could not be lifted.
    pub const MALFORMED: i32 = 1;
    /// The allocator refused a buffer.
    pub const ALLOC: i32 = 2;

    pub const fn new() -> Self {
        Self {
            code: Self::SUCCESS,
            message: ptr::null_mut(),
        }
    }

    pub fn is_err(&self) -> bool {
        self.code != Self::SUCCESS
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    /// Records a failure, replacing any earlier one.
    ///
    /// Interior NUL bytes are dropped from the message.
    pub fn set(&mut self, code: i32, message: impl Into<String>) {
        debug_assert_ne!(code, Self::SUCCESS, "a failure needs a non-zero code");
        self.release_message();
        let bytes: Vec<u8> = message.into().into_bytes().into_iter().filter(|&b| b != 0).collect();
        self.code = code;
        self.message = CString::new(bytes).unwrap_or_default().into_raw();
    }

    /// Takes the failure out, leaving the status at success.
    pub fn take(&mut self) -> Option<(i32, String)> {
        if !self.is_err() {
            return None;
        }
        let code = std::mem::replace(&mut self.code, Self::SUCCESS);
        Some((code, self.take_message().unwrap_or_default()))
    }

    fn take_message(&mut self) -> Option<String> {
        let raw = std::mem::replace(&mut self.message, ptr::null_mut());
        if raw.is_null() {
            return None;
        }
        // SAFETY: a non-null message is always one produced by `set`.
        let message = unsafe { CString::from_raw(raw) };
        Some(message.to_string_lossy().into_owned())
    }

    fn release_message(&mut self) {
        let _ = self.take_message();
    }
}

impl Default for RustError {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RustError {
    fn drop(&mut self) {
        self.release_message();
    }
}
