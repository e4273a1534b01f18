use core::fmt;

/// Errors of the shared crate.
///
/// None of them is fatal: the transceiver drops the offending input and
/// keeps polling.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// Malformed numeric text
    InvalidInput,
    /// Numeric base other than 10 or 16
    UnsupportedBase(u32),
    /// Serial line longer than the line buffer
    LineOverflow,
    /// Fixed capacity buffer is full
    BufferFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput => write!(f, "invalid input"),
            Error::UnsupportedBase(base) => write!(f, "unsupported base: {}", base),
            Error::LineOverflow => write!(f, "line too long"),
            Error::BufferFull => write!(f, "buffer full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
