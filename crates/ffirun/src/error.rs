//! # Error Definitions

use ffipack::AllocError;
use ffipack::Error as PackError;

use crate::status::RustError;

/// Why a call across the boundary did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The callee reported failure through its status.
    Failed { code: i32, message: String },
    /// A value arrived in bounds but could not be lifted.
    Malformed(PackError),
    /// The allocator refused a buffer.
    Alloc(AllocError),
}

impl CallError {
    pub fn failed(code: i32, message: impl Into<String>) -> Self {
        Self::Failed {
            code,
            message: message.into(),
        }
    }

    /// The status code this error is reported under.
    pub fn code(&self) -> i32 {
        match self {
            CallError::Failed { code, .. } => *code,
            CallError::Malformed(_) => RustError::MALFORMED,
            CallError::Alloc(_) => RustError::ALLOC,
        }
    }
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::Failed { code, message } => write!(f, "call failed with code {}: {}", code, message),
            CallError::Malformed(e) => write!(f, "{}", e),
            CallError::Alloc(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Failed { .. } => None,
            CallError::Malformed(e) => Some(e),
            CallError::Alloc(e) => Some(e),
        }
    }
}

impl From<PackError> for CallError {
    fn from(e: PackError) -> Self {
        Self::Malformed(e)
    }
}

impl From<AllocError> for CallError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}

/// A specialized Result type for foreign calls.
pub type Result<T> = std::result::Result<T, CallError>;
