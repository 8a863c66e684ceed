//! Error types for the lzwc library.

use std::fmt;

/// Result type alias for lzwc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during compression or expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Minimum codeword width of zero (cannot write 0-bit codewords).
    MinWidthZero,
    /// Maximum codeword width is smaller than the minimum.
    WidthOrder {
        /// Requested minimum width.
        min: u32,
        /// Requested maximum width.
        max: u32,
    },
    /// Maximum codeword width exceeds the 32 bits a codeword can hold.
    MaxWidthOverflow(u32),
    /// The minimum width cannot represent the alphabet plus reserved codes.
    MinWidthTooSmall {
        /// Requested minimum width.
        min: u32,
        /// Number of codes that must be representable at that width.
        required: usize,
    },
    /// The alphabet contains no symbols.
    EmptyAlphabet,
    /// The input contains a byte that is not in the alphabet.
    ByteNotInAlphabet(u8),
    /// Malformed compressed data; the payload is the complete diagnostic.
    InvalidDecode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MinWidthZero => {
                write!(f, "minW must be at least 1 (cannot write 0-bit codewords)")
            }
            Error::WidthOrder { min, max } => {
                write!(f, "maxW ({}) must be >= minW ({})", max, min)
            }
            Error::MaxWidthOverflow(max) => {
                write!(f, "maxW ({}) exceeds 32, the largest codeword width", max)
            }
            Error::MinWidthTooSmall { min, required } => {
                write!(
                    f,
                    "minW ({}) cannot represent the {} initial codes (alphabet plus reserved)",
                    min, required
                )
            }
            Error::EmptyAlphabet => {
                write!(f, "alphabet contains no valid symbols")
            }
            Error::ByteNotInAlphabet(b) => {
                write!(
                    f,
                    "Input contains byte value {} which is not in the alphabet",
                    b
                )
            }
            Error::InvalidDecode(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::ByteNotInAlphabet(0x7A).to_string(),
            "Input contains byte value 122 which is not in the alphabet"
        );
        assert_eq!(
            Error::WidthOrder { min: 9, max: 8 }.to_string(),
            "maxW (8) must be >= minW (9)"
        );
        // The payload is the whole message, with no wrapper diluting it.
        assert_eq!(
            Error::InvalidDecode("Bad compressed code: 17".into()).to_string(),
            "Bad compressed code: 17"
        );
    }
}
