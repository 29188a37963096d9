//! Canonical bit sequences and the mod-2 primitives built on them.
//!
//! Every public entry point of the crate accepts bits in several shapes: strings of
//! `'0'`/`'1'` characters, slices of 0/1 integers, slices of `bool`, or `bitvec`
//! containers. They are normalized once, at the boundary, by the [`IntoBits`]
//! trait into a [`Bits`] value; everything past the boundary works on
//! [`BitsRef`] slices.
//!
//! # Examples
//!
//! ```
//! use convcode::bits::{hamming_distance, to_bits, to_string};
//!
//! let a = to_bits("1101").unwrap();
//! let b = to_bits([1u8, 0, 0, 1]).unwrap();
//! assert_eq!(hamming_distance(&a, &b).unwrap(), 1);
//! assert_eq!(to_string(&b), "1001");
//! ```

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Owned canonical bit sequence
pub type Bits = BitVec<u8, Msb0>;

/// Borrowed canonical bit sequence
pub type BitsRef = BitSlice<u8, Msb0>;

/// Conversion of caller-supplied bit sequences into [`Bits`].
pub trait IntoBits {
    /// Normalizes `self`, failing with [`Error::InvalidBit`] on any symbol other than 0 or 1.
    fn into_bits(self) -> Result<Bits>;
}

/// Normalizes any supported bit representation into [`Bits`].
pub fn to_bits<B: IntoBits>(input: B) -> Result<Bits> {
    input.into_bits()
}

/// Parses a string of `'0'` and `'1'` characters.
///
/// ASCII whitespace is skipped so that blocks can be written as `"11 10 01"`.
/// Positions in errors count characters of the original string.
pub fn parse_bits(s: &str) -> Result<Bits> {
    let mut bits = Bits::with_capacity(s.len());
    for (position, c) in s.chars().enumerate() {
        match c {
            '0' => bits.push(false),
            '1' => bits.push(true),
            c if c.is_ascii_whitespace() => {}
            other => {
                return Err(Error::InvalidBit {
                    position,
                    found: other.to_string(),
                })
            }
        }
    }
    Ok(bits)
}

fn from_integers(values: &[u8]) -> Result<Bits> {
    let mut bits = Bits::with_capacity(values.len());
    for (position, &value) in values.iter().enumerate() {
        match value {
            0 => bits.push(false),
            1 => bits.push(true),
            other => {
                return Err(Error::InvalidBit {
                    position,
                    found: other.to_string(),
                })
            }
        }
    }
    Ok(bits)
}

/// Renders bits as a string of `'0'` and `'1'` characters.
pub fn to_string(bits: &BitsRef) -> String {
    bits.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

/// Counts the positions at which two equal-length sequences differ.
pub fn hamming_distance(a: &BitsRef, b: &BitsRef) -> Result<usize> {
    if a.len() != b.len() {
        return Err(Error::length_mismatch(a.len(), b.len()));
    }

    Ok(count_differences(a, b))
}

/// Hamming distance without the length check, for operands known to be equal in length.
pub(crate) fn count_differences(a: &BitsRef, b: &BitsRef) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .by_vals()
        .zip(b.iter().by_vals())
        .filter(|(x, y)| x != y)
        .count()
}

/// Inner product over GF(2): elementwise AND, then parity of the result.
pub fn inner_product_mod2(a: &BitsRef, b: &BitsRef) -> Result<bool> {
    if a.len() != b.len() {
        return Err(Error::length_mismatch(a.len(), b.len()));
    }

    let ones = a.iter_ones().filter(|&i| b[i]).count();
    Ok(ones % 2 == 1)
}

impl IntoBits for &str {
    fn into_bits(self) -> Result<Bits> {
        parse_bits(self)
    }
}

impl IntoBits for String {
    fn into_bits(self) -> Result<Bits> {
        parse_bits(&self)
    }
}

impl IntoBits for &String {
    fn into_bits(self) -> Result<Bits> {
        parse_bits(self)
    }
}

impl IntoBits for &[u8] {
    fn into_bits(self) -> Result<Bits> {
        from_integers(self)
    }
}

impl IntoBits for Vec<u8> {
    fn into_bits(self) -> Result<Bits> {
        from_integers(&self)
    }
}

impl IntoBits for &Vec<u8> {
    fn into_bits(self) -> Result<Bits> {
        from_integers(self)
    }
}

impl<const N: usize> IntoBits for [u8; N] {
    fn into_bits(self) -> Result<Bits> {
        from_integers(&self)
    }
}

impl<const N: usize> IntoBits for &[u8; N] {
    fn into_bits(self) -> Result<Bits> {
        from_integers(self)
    }
}

impl IntoBits for &[bool] {
    fn into_bits(self) -> Result<Bits> {
        Ok(self.iter().copied().collect())
    }
}

impl IntoBits for Vec<bool> {
    fn into_bits(self) -> Result<Bits> {
        Ok(self.into_iter().collect())
    }
}

impl<const N: usize> IntoBits for [bool; N] {
    fn into_bits(self) -> Result<Bits> {
        Ok(self.into_iter().collect())
    }
}

impl IntoBits for Bits {
    fn into_bits(self) -> Result<Bits> {
        Ok(self)
    }
}

impl IntoBits for &Bits {
    fn into_bits(self) -> Result<Bits> {
        Ok(self.clone())
    }
}

impl IntoBits for &BitsRef {
    fn into_bits(self) -> Result<Bits> {
        Ok(self.to_bitvec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representations_agree() {
        let expected = bitvec![u8, Msb0; 1, 0, 1, 1];

        assert_eq!(to_bits("1011").unwrap(), expected);
        assert_eq!(to_bits(String::from("10 11")).unwrap(), expected);
        assert_eq!(to_bits([1u8, 0, 1, 1]).unwrap(), expected);
        assert_eq!(to_bits(vec![1u8, 0, 1, 1]).unwrap(), expected);
        assert_eq!(to_bits(&[1u8, 0, 1, 1][..]).unwrap(), expected);
        assert_eq!(to_bits([true, false, true, true]).unwrap(), expected);
        assert_eq!(to_bits(vec![true, false, true, true]).unwrap(), expected);
        assert_eq!(to_bits(expected.as_bitslice()).unwrap(), expected);
        assert_eq!(to_bits(&expected).unwrap(), expected);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(to_bits("").unwrap().is_empty());
        assert!(to_bits(Vec::<u8>::new()).unwrap().is_empty());
        assert_eq!(to_string(&Bits::new()), "");
    }

    #[test]
    fn test_invalid_symbols() {
        assert_eq!(
            to_bits("10x1"),
            Err(Error::InvalidBit {
                position: 2,
                found: "x".to_string()
            })
        );
        assert_eq!(
            to_bits([0u8, 1, 2]),
            Err(Error::InvalidBit {
                position: 2,
                found: "2".to_string()
            })
        );
        // ASCII digits as raw bytes are not bits
        assert!(to_bits(&b"01"[..]).is_err());
    }

    #[test]
    fn test_to_string_round_trip() {
        let bits = to_bits("0110100").unwrap();
        assert_eq!(to_string(&bits), "0110100");
    }

    #[test]
    fn test_hamming_distance() {
        let a = to_bits("1100").unwrap();
        let b = to_bits("1010").unwrap();

        assert_eq!(hamming_distance(&a, &b).unwrap(), 2);
        assert_eq!(hamming_distance(&b, &a).unwrap(), 2);
        assert_eq!(hamming_distance(&a, &a).unwrap(), 0);
        assert_eq!(hamming_distance(&Bits::new(), &Bits::new()).unwrap(), 0);

        let short = to_bits("10").unwrap();
        assert_eq!(
            hamming_distance(&a, &short),
            Err(Error::LengthMismatch { left: 4, right: 2 })
        );
    }

    #[test]
    fn test_inner_product_mod2() {
        let g = to_bits("111").unwrap();
        assert!(inner_product_mod2(&g, &to_bits("100").unwrap()).unwrap());
        assert!(!inner_product_mod2(&g, &to_bits("110").unwrap()).unwrap());
        assert!(inner_product_mod2(&g, &to_bits("111").unwrap()).unwrap());
        assert!(!inner_product_mod2(&g, &to_bits("000").unwrap()).unwrap());

        let h = to_bits("101").unwrap();
        assert!(!inner_product_mod2(&h, &to_bits("111").unwrap()).unwrap());
        assert!(inner_product_mod2(&h, &to_bits("011").unwrap()).unwrap());

        assert_eq!(
            inner_product_mod2(&g, &to_bits("11").unwrap()),
            Err(Error::LengthMismatch { left: 3, right: 2 })
        );
    }
}
