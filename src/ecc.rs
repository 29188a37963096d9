//! Convolutional error correction.
//!
//! This module provides a rate 1/n binary convolutional code and its decoder:
//! - Generator polynomial sets and the mod-2 window convolution
//! - The encoder's finite-state automaton over its K-1 memory bits
//! - Encoding from the all-zero state
//! - Hard-decision Viterbi decoding with deterministic survivor selection
//!
//! # Examples
//!
//! ```
//! use convcode::bits::to_bits;
//! use convcode::ecc::{ConvolutionalCode, ViterbiDecoder};
//!
//! let code = ConvolutionalCode::nasa_standard_rate_half();
//! let data = to_bits("1011001110").unwrap();
//!
//! let mut received = code.encode(&data).unwrap();
//! let bit = received[4];
//! received.set(4, !bit);
//!
//! let result = ViterbiDecoder::new(code).decode_detailed(&received).unwrap();
//! assert_eq!(result.decoded, data);
//! assert_eq!(result.corrected_errors, 1);
//! ```

use crate::bits::{Bits, BitsRef};
pub use crate::error::Result;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &BitsRef) -> Result<Bits>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &BitsRef) -> Result<Bits>;
}

pub mod convolutional;
pub mod fsa;
pub mod generator;
pub mod viterbi;

pub use convolutional::{
    convolutional_encode, create_convolutional_code, create_nasa_standard_code,
    create_rate_third_code, create_standard_viterbi_decoder, create_viterbi_decoder,
    viterbi_decode, ConvolutionalCode,
};
pub use fsa::{Fsa, State, Transition};
pub use generator::{GeneratorSet, MAX_CONSTRAINT_LENGTH};
pub use viterbi::{DecoderConfig, ViterbiDecoder, ViterbiResult};
