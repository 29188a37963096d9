//! Convolutional error correction code implementation.
//!
//! Convolutional codes are a class of error-correcting codes where each input bit
//! is transformed into an n-bit block, where 1/n is the code rate and the
//! transformation is a function of the last K input bits, where K is the
//! constraint length.
//!
//! Unlike block codes, convolutional codes process data continuously and can be
//! efficiently decoded using the Viterbi algorithm. They are commonly used in:
//!
//! - Satellite communications
//! - Mobile telephony
//! - Digital video broadcasting
//! - Deep space communications
//! - 802.11 wireless networks
//!
//! This implementation provides:
//! - Configurable constraint length and any number of generator polynomials
//! - Generators given as coefficient sequences or in octal notation
//! - Encoding by sliding-window convolution from the all-zero state
//! - Decoding using the hard-decision Viterbi algorithm
//! - Common convolutional code configurations (e.g., NASA's standard rates)
//!
//! # Examples
//!
//! ```
//! use convcode::bits::to_string;
//! use convcode::ecc::ConvolutionalCode;
//!
//! let code = ConvolutionalCode::new(3, ["111", "110"]).unwrap();
//! let encoded = code.encode("1011").unwrap();
//! assert_eq!(to_string(&encoded), "11110100");
//!
//! let decoded = code.decode(&encoded).unwrap();
//! assert_eq!(to_string(&decoded), "1011");
//! ```

use crate::bits::{Bits, BitsRef, IntoBits};
use crate::ecc::fsa::Fsa;
use crate::ecc::generator::GeneratorSet;
use crate::ecc::viterbi::ViterbiDecoder;
use crate::ecc::ErrorCorrection;
use crate::error::Result;
use log::debug;
use std::sync::Arc;

/// Represents a rate 1/n convolutional code.
///
/// The transition table is built once when the code is created and shared by all
/// clones, so cloning a code or handing it to a [`ViterbiDecoder`] is cheap.
#[derive(Debug, Clone)]
pub struct ConvolutionalCode {
    generators: GeneratorSet,
    fsa: Arc<Fsa>,
}

impl ConvolutionalCode {
    /// Creates a new convolutional code configuration.
    ///
    /// # Arguments
    ///
    /// * `constraint_length` - Number of input bits influencing one output block (K)
    /// * `generators` - One coefficient sequence of length K per output bit
    ///
    /// # Returns
    ///
    /// A new `ConvolutionalCode` instance or an error if invalid parameters
    pub fn new<I, B>(constraint_length: usize, generators: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: IntoBits,
    {
        Self::from_generators(GeneratorSet::new(constraint_length, generators)?)
    }

    /// Creates a code with generator polynomials written as octal tap masks.
    pub fn from_octal(constraint_length: usize, masks: &[u64]) -> Result<Self> {
        Self::from_generators(GeneratorSet::from_octal(constraint_length, masks)?)
    }

    /// Creates a code from a validated generator set and builds its transition table.
    pub fn from_generators(generators: GeneratorSet) -> Result<Self> {
        let fsa = Fsa::build(&generators)?;
        debug!(
            "Built convolutional code {}: rate 1/{}, {} states",
            generators,
            generators.len(),
            fsa.num_states()
        );

        Ok(Self {
            generators,
            fsa: Arc::new(fsa),
        })
    }

    /// Creates a standard rate 1/2, constraint length 7 convolutional code (NASA standard)
    pub fn nasa_standard_rate_half() -> Self {
        // 171 and 133 octal, i.e. 1111001 and 1011011
        Self::from_octal(7, &[0o171, 0o133]).expect("NASA K=7 generators are valid")
    }

    /// Creates a standard rate 1/3, constraint length 7 convolutional code
    pub fn standard_rate_third() -> Self {
        Self::from_octal(7, &[0o171, 0o165, 0o133]).expect("K=7 rate 1/3 generators are valid")
    }

    /// Constraint length K
    pub fn constraint_length(&self) -> usize {
        self.generators.constraint_length()
    }

    /// Number of generators n, i.e. output bits per input bit
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Encoder memory, K-1
    pub fn memory(&self) -> usize {
        self.constraint_length() - 1
    }

    /// Number of trellis states, 2^(K-1)
    pub fn num_states(&self) -> usize {
        self.fsa.num_states()
    }

    /// Gets the code rate as a fraction (1/n)
    pub fn code_rate(&self) -> f64 {
        1.0 / self.generator_count() as f64
    }

    /// Gets the number of encoded bits produced for a given number of input bits
    pub fn encoded_len(&self, input_bits: usize) -> usize {
        input_bits * self.generator_count()
    }

    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    /// The encoder's transition table
    pub fn fsa(&self) -> &Fsa {
        &self.fsa
    }

    /// Computes the output block for a window of exactly K bits, newest bit first.
    pub fn output<B: IntoBits>(&self, window: B) -> Result<Bits> {
        self.generators.output(&window.into_bits()?)
    }

    /// Encodes an input bit sequence.
    ///
    /// The input is reversed and padded with K-1 zero bits, then every K-bit window
    /// is convolved with the generators, starting from the window of the first input
    /// bit. Output blocks follow input order, giving `n * len(input)` bits.
    pub fn encode<B: IntoBits>(&self, input: B) -> Result<Bits> {
        let word = input.into_bits()?;
        let k = self.constraint_length();

        let mut padded = Bits::with_capacity(word.len() + k - 1);
        padded.extend(word.iter().by_vals().rev());
        padded.resize(word.len() + k - 1, false);

        let mut encoded = Bits::with_capacity(self.encoded_len(word.len()));
        for start in (0..word.len()).rev() {
            let block = self.generators.output(&padded[start..start + k])?;
            encoded.extend_from_bitslice(block.as_bitslice());
        }

        Ok(encoded)
    }

    /// Decodes a received sequence with the Viterbi algorithm
    pub fn decode<B: IntoBits>(&self, received: B) -> Result<Bits> {
        ViterbiDecoder::new(self.clone()).decode(received)
    }
}

impl ErrorCorrection for ConvolutionalCode {
    fn encode(&self, data: &BitsRef) -> Result<Bits> {
        ConvolutionalCode::encode(self, data)
    }

    fn decode(&self, data: &BitsRef) -> Result<Bits> {
        ConvolutionalCode::decode(self, data)
    }
}

/// Creates a NASA standard rate 1/2, constraint length 7 convolutional code
pub fn create_nasa_standard_code() -> ConvolutionalCode {
    ConvolutionalCode::nasa_standard_rate_half()
}

/// Creates a standard rate 1/3, constraint length 7 convolutional code
pub fn create_rate_third_code() -> ConvolutionalCode {
    ConvolutionalCode::standard_rate_third()
}

/// Creates a custom convolutional code from octal generator masks
pub fn create_convolutional_code(
    constraint_length: usize,
    generator_polys: &[u64],
) -> Result<ConvolutionalCode> {
    ConvolutionalCode::from_octal(constraint_length, generator_polys)
}

/// Encodes data using the NASA standard rate 1/2 convolutional code
pub fn convolutional_encode<B: IntoBits>(data: B) -> Result<Bits> {
    create_nasa_standard_code().encode(data)
}

/// Decodes data using the Viterbi algorithm with the NASA standard rate 1/2 convolutional code
pub fn viterbi_decode<B: IntoBits>(encoded: B) -> Result<Bits> {
    create_standard_viterbi_decoder().decode(encoded)
}

/// Creates a Viterbi decoder for the NASA standard rate 1/2 convolutional code
pub fn create_standard_viterbi_decoder() -> ViterbiDecoder {
    ViterbiDecoder::new(create_nasa_standard_code())
}

/// Creates a Viterbi decoder for the specified convolutional code
pub fn create_viterbi_decoder(code: ConvolutionalCode) -> ViterbiDecoder {
    ViterbiDecoder::new(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{to_bits, to_string};
    use crate::error::Error;

    fn example_code() -> ConvolutionalCode {
        ConvolutionalCode::new(3, ["111", "110"]).unwrap()
    }

    #[test]
    fn test_convolutional_creation() {
        // NASA standard code
        let code = ConvolutionalCode::nasa_standard_rate_half();
        assert_eq!(code.constraint_length(), 7);
        assert_eq!(code.generator_count(), 2);
        assert_eq!(code.memory(), 6);
        assert_eq!(code.num_states(), 64);
        assert_eq!(code.code_rate(), 0.5);

        // Rate 1/3 code
        let code = ConvolutionalCode::standard_rate_third();
        assert_eq!(code.constraint_length(), 7);
        assert_eq!(code.generator_count(), 3);
        assert_eq!(code.code_rate(), 1.0 / 3.0);
        assert_eq!(code.encoded_len(10), 30);

        // Custom code
        let code = create_convolutional_code(5, &[0o23, 0o31]).unwrap();
        assert_eq!(code.constraint_length(), 5);
        assert_eq!(code.num_states(), 16);

        // First polynomial exceeds constraint length
        assert!(ConvolutionalCode::from_octal(3, &[0o17, 0o5]).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            ConvolutionalCode::new(0, Vec::<&str>::new()),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            ConvolutionalCode::new(3, ["111", "1101"]),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            ConvolutionalCode::new(2, Vec::<&str>::new()),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_output_window() {
        let code = example_code();
        assert_eq!(to_string(&code.output("101").unwrap()), "01");
        assert_eq!(to_string(&code.output([1u8, 0, 0]).unwrap()), "11");
        assert_eq!(
            code.output("1010"),
            Err(Error::LengthMismatch { left: 4, right: 3 })
        );
    }

    #[test]
    fn test_encode_reference_vector() {
        // Windows (newest first): 100, 010, 101, 110
        let code = example_code();
        let encoded = code.encode([1u8, 0, 1, 1]).unwrap();
        assert_eq!(to_string(&encoded), "11110100");
        assert_eq!(encoded.len(), code.encoded_len(4));
    }

    #[test]
    fn test_encode_short_inputs() {
        let code = example_code();
        assert!(code.encode("").unwrap().is_empty());
        assert_eq!(to_string(&code.encode("1").unwrap()), "11");
        assert_eq!(to_string(&code.encode("11").unwrap()), "1100");

        let memoryless = ConvolutionalCode::new(1, ["1", "1"]).unwrap();
        assert_eq!(to_string(&memoryless.encode("101").unwrap()), "110011");
    }

    #[test]
    fn test_encode_matches_fsa_walk() {
        let code = create_convolutional_code(5, &[0o23, 0o35]).unwrap();
        let data = to_bits("1101001110100010111").unwrap();

        let mut state = code.fsa().start_state();
        let mut expected = Bits::new();
        for bit in data.iter().by_vals() {
            let t = code.fsa().transition(state, bit).unwrap();
            expected.extend_from_bitslice(t.output.as_bitslice());
            state = t.next_state;
        }

        assert_eq!(code.encode(&data).unwrap(), expected);
    }

    #[test]
    fn test_encode_known_code() {
        // The (5, 7) octal K=3 code
        let code = create_convolutional_code(3, &[0o5, 0o7]).unwrap();
        let encoded = code.encode("101100").unwrap();
        assert_eq!(to_string(&encoded), "110100101011");
    }

    #[test]
    fn test_encode_decode_no_errors() {
        let data = to_bits("0100110101110010001011110000110101").unwrap();
        let code = create_nasa_standard_code();

        let encoded = code.encode(&data).unwrap();
        let decoded = code.decode(&encoded).unwrap();

        assert_eq!(decoded, data);
    }

    #[test]
    fn test_convolutional_error_correction() {
        let code = example_code();
        let decoded = code.decode("01 11 01 00").unwrap();
        assert_eq!(to_string(&decoded), "1011");

        let decoded = code.decode("00000000").unwrap();
        assert_eq!(to_string(&decoded), "0000");
    }

    #[test]
    fn test_multiple_errors() {
        // Convolutional codes can correct multiple errors if they're spaced apart
        let data = to_bits("1011001110001011010011101").unwrap();
        let code = create_nasa_standard_code();

        let mut encoded = code.encode(&data).unwrap();
        for i in [3, 20, 41] {
            let bit = encoded[i];
            encoded.set(i, !bit);
        }

        let decoded = code.decode(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_empty_input() {
        let code = create_nasa_standard_code();

        let encoded = code.encode(Bits::new()).unwrap();
        assert!(encoded.is_empty());

        let decoded = code.decode(Bits::new()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_helper_functions() {
        let data = to_bits("110100111").unwrap();

        let encoded = convolutional_encode(&data).unwrap();
        assert_eq!(encoded.len(), 18);
        let decoded = viterbi_decode(&encoded).unwrap();
        assert_eq!(decoded, data);

        let custom_code = create_convolutional_code(5, &[0o23, 0o35]).unwrap();
        let custom_decoder = create_viterbi_decoder(custom_code.clone());
        let encoded = custom_code.encode(&data).unwrap();
        let result = custom_decoder.decode_detailed(&encoded).unwrap();
        assert_eq!(result.decoded, data);
        assert_eq!(result.final_metric, 0);

        let third = create_rate_third_code();
        let encoded = third.encode(&data).unwrap();
        assert_eq!(encoded.len(), 27);
        assert_eq!(third.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_error_correction_trait() {
        let code: Box<dyn ErrorCorrection> = Box::new(example_code());
        let data = to_bits("1011").unwrap();

        let encoded = code.encode(&data).unwrap();
        assert_eq!(to_string(&encoded), "11110100");
        assert_eq!(code.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_clones_share_fsa() {
        let code = create_nasa_standard_code();
        let copy = code.clone();
        assert!(Arc::ptr_eq(&code.fsa, &copy.fsa));
    }
}
