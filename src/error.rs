//! Error types shared by the encoder, the trellis decoder and the bit utilities.

use thiserror::Error;

/// Result type for convolutional coding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a precondition of an operation is violated.
///
/// Every error is reported before any observable work happens, so a failed call
/// never leaves a partial result behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed code parameters (constraint length or generator set)
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operands of a fixed-arity primitive have different lengths
    #[error("Length mismatch: left operand has {left} bits, right operand has {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Received sequence is not a whole number of output blocks
    #[error("Invalid input length: {len} bits is not a multiple of the block size {block}")]
    InvalidInputLength { len: usize, block: usize },

    /// A symbol that is neither 0 nor 1 was found while normalizing a bit sequence
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: String },
}

impl Error {
    pub fn invalid_parameters<S: Into<String>>(msg: S) -> Self {
        Error::InvalidParameters(msg.into())
    }

    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Error::LengthMismatch { left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::invalid_parameters("constraint length must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid parameters: constraint length must be positive"
        );

        let err = Error::length_mismatch(3, 4);
        assert_eq!(
            err.to_string(),
            "Length mismatch: left operand has 3 bits, right operand has 4"
        );

        let err = Error::InvalidInputLength { len: 7, block: 2 };
        assert!(err.to_string().contains("not a multiple of the block size 2"));

        let err = Error::InvalidBit {
            position: 2,
            found: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid bit \"x\" at position 2");
    }
}
