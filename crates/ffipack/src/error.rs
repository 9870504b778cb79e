//! # Error Definitions
//!
//! Only recoverable failures live here. Anything that means the two sides of
//! the boundary disagree about layout goes through `fatal!` instead.

/// A payload that was fully in bounds but not self-consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An optional's tag byte was neither 0 (absent) nor 1 (present).
    InvalidOptionTag(u8),
    /// A boolean byte was neither 0 nor 1.
    InvalidBool(u8),
    /// String data is not valid UTF-8.
    InvalidUtf8,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidOptionTag(b) => write!(f, "Malformed payload: invalid option tag {:#04x}", b),
            Error::InvalidBool(b) => write!(f, "Malformed payload: invalid bool byte {:#04x}", b),
            Error::InvalidUtf8 => write!(f, "Malformed payload: string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure reported by a foreign allocation or release entry point.
///
/// Callers inside this crate never recover from one of these; it is carried
/// as a value so the diagnostic can name the code and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    pub code: i32,
    pub message: String,
}

impl AllocError {
    /// The requested buffer is larger than the allocator accepts.
    pub const TOO_LARGE: i32 = 1;
    /// The buffer handed to `free` was not produced by this allocator.
    pub const NOT_OWNED: i32 = 2;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "allocator error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for AllocError {}
