//! Generator polynomials of a rate 1/n convolutional code.

use crate::bits::{inner_product_mod2, Bits, BitsRef, IntoBits};
use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};

/// Largest constraint length accepted by [`GeneratorSet`]; the trellis has
/// `2^(k-1)` states so this keeps the transition table around a million entries.
pub const MAX_CONSTRAINT_LENGTH: usize = 20;

/// An ordered, immutable set of `n` generator polynomials of `k` coefficients each.
///
/// Coefficient `i` of a polynomial multiplies position `i` of the encoder window,
/// where position 0 holds the newest input bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSet {
    constraint_length: usize,
    polynomials: Vec<Bits>,
}

impl GeneratorSet {
    /// Creates a generator set from per-polynomial coefficient sequences.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameters`] if the constraint length is zero or above
    /// [`MAX_CONSTRAINT_LENGTH`], the set is empty, or a polynomial does not have
    /// exactly `constraint_length` coefficients. Malformed coefficients surface as
    /// [`Error::InvalidBit`].
    pub fn new<I, B>(constraint_length: usize, polynomials: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: IntoBits,
    {
        validate_constraint_length(constraint_length)?;

        let polynomials = polynomials
            .into_iter()
            .map(IntoBits::into_bits)
            .collect::<Result<Vec<_>>>()?;

        if polynomials.is_empty() {
            return Err(Error::invalid_parameters(
                "At least one generator polynomial is required",
            ));
        }

        for (i, poly) in polynomials.iter().enumerate() {
            if poly.len() != constraint_length {
                return Err(Error::invalid_parameters(format!(
                    "Generator polynomial {} has {} coefficients, expected {}",
                    i,
                    poly.len(),
                    constraint_length
                )));
            }
        }

        Ok(Self {
            constraint_length,
            polynomials,
        })
    }

    /// Creates a generator set from tap masks in the conventional octal notation.
    ///
    /// The most significant of the `constraint_length` bits taps the newest input,
    /// so `0o171` with `k = 7` is the polynomial `1111001`.
    pub fn from_octal(constraint_length: usize, masks: &[u64]) -> Result<Self> {
        validate_constraint_length(constraint_length)?;

        let limit = 1u64 << constraint_length;
        let mut polynomials = Vec::with_capacity(masks.len());
        for (i, &mask) in masks.iter().enumerate() {
            if mask >= limit {
                return Err(Error::invalid_parameters(format!(
                    "Generator polynomial {} ({:o}) exceeds maximum value for constraint length {}",
                    i, mask, constraint_length
                )));
            }
            let poly: Bits = (0..constraint_length)
                .map(|pos| (mask >> (constraint_length - 1 - pos)) & 1 == 1)
                .collect();
            polynomials.push(poly);
        }

        Self::new(constraint_length, polynomials)
    }

    /// Constraint length `k`
    pub fn constraint_length(&self) -> usize {
        self.constraint_length
    }

    /// Number of polynomials `n`
    pub fn len(&self) -> usize {
        self.polynomials.len()
    }

    /// Always false; a set holds at least one polynomial
    pub fn is_empty(&self) -> bool {
        self.polynomials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BitsRef> {
        self.polynomials.iter().map(|p| p.as_bitslice())
    }

    /// Polynomial `index` as a coefficient slice
    pub fn get(&self, index: usize) -> Option<&BitsRef> {
        self.polynomials.get(index).map(|p| p.as_bitslice())
    }

    /// Tap mask of polynomial `index` in the notation accepted by [`GeneratorSet::from_octal`].
    pub fn mask(&self, index: usize) -> Option<u64> {
        self.polynomials
            .get(index)
            .map(|p| p.iter().by_vals().fold(0u64, |acc, bit| (acc << 1) | bit as u64))
    }

    /// Computes one output bit per polynomial for a `k`-bit window, in polynomial order.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if the window does not hold exactly `k` bits.
    pub fn output(&self, window: &BitsRef) -> Result<Bits> {
        if window.len() != self.constraint_length {
            return Err(Error::length_mismatch(window.len(), self.constraint_length));
        }

        self.polynomials
            .iter()
            .map(|poly| inner_product_mod2(poly, window))
            .collect()
    }
}

impl Display for GeneratorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "K={} [", self.constraint_length)?;
        for i in 0..self.polynomials.len() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:o}", self.mask(i).unwrap_or_default())?;
        }
        write!(f, "]")
    }
}

fn validate_constraint_length(constraint_length: usize) -> Result<()> {
    if constraint_length == 0 {
        return Err(Error::invalid_parameters(
            "Constraint length must be positive",
        ));
    }
    if constraint_length > MAX_CONSTRAINT_LENGTH {
        return Err(Error::invalid_parameters(format!(
            "Constraint length {} exceeds the supported maximum of {}",
            constraint_length, MAX_CONSTRAINT_LENGTH
        )));
    }
    Ok(())
}
