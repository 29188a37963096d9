//! Binary convolutional codes with hard-decision Viterbi decoding.
//!
//! A [`ConvolutionalCode`] is described by its constraint length K and a set of
//! generator polynomials of K coefficients each. Encoding convolves the input with
//! every generator over a sliding window; decoding searches the encoder's trellis
//! for the input whose encoding lies at minimum Hamming distance from the received
//! bits.
//!
//! ```
//! use convcode::{bits::to_string, ConvolutionalCode};
//!
//! let code = ConvolutionalCode::new(3, ["111", "110"]).unwrap();
//! let encoded = code.encode("1011").unwrap();
//! assert_eq!(to_string(&encoded), "11110100");
//!
//! // One flipped bit in the first block is corrected
//! let decoded = code.decode("01110100").unwrap();
//! assert_eq!(to_string(&decoded), "1011");
//! ```

pub mod bits;
pub mod ecc;
pub mod error;

pub use bits::{hamming_distance, inner_product_mod2, to_bits, Bits, BitsRef, IntoBits};
pub use ecc::{
    ConvolutionalCode, DecoderConfig, ErrorCorrection, Fsa, GeneratorSet, State, Transition,
    ViterbiDecoder, ViterbiResult,
};
pub use error::{Error, Result};
