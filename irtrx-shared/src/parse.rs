//! Numeric text parsing for serial commands

use core::convert::TryFrom;

use crate::error::Error;

/// Shortest accepted `0x` prefixed input
const MIN_PREFIXED_LEN: usize = 4;

/// Parse an unsigned integer in base 10 or 16.
///
/// Base 16 input may carry a `0x` or `0X` prefix. Empty input, stray
/// characters and values wider than 32 bits are rejected.
pub fn parse_u32(text: &str, base: u32) -> Result<u32, Error> {
    if base != 10 && base != 16 {
        return Err(Error::UnsupportedBase(base));
    }

    let bytes = text.as_bytes();

    let digits = match bytes {
        [b'0', b'x', ..] | [b'0', b'X', ..] if base == 16 => {
            if bytes.len() < MIN_PREFIXED_LEN {
                return Err(Error::InvalidInput);
            }
            &bytes[2..]
        }
        _ => bytes,
    };

    if digits.is_empty() {
        return Err(Error::InvalidInput);
    }

    digits.iter().try_fold(0u32, |acc, &c| {
        let digit = char::from(c).to_digit(base).ok_or(Error::InvalidInput)?;
        acc.checked_mul(base)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or(Error::InvalidInput)
    })
}

pub fn parse_u16(text: &str, base: u32) -> Result<u16, Error> {
    parse_u32(text, base).and_then(|value| u16::try_from(value).map_err(|_| Error::InvalidInput))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        assert_eq!(parse_u32("0x10EF", 16), Ok(0x10EF));
        assert_eq!(parse_u32("0X10ef", 16), Ok(4335));
        assert_eq!(parse_u32("10ef", 16), Ok(0x10EF));
        assert_eq!(parse_u32("ffffffff", 16), Ok(u32::MAX));
    }

    #[test]
    fn decimal() {
        assert_eq!(parse_u32("4079", 10), Ok(4079));
        assert_eq!(parse_u32("0", 10), Ok(0));
    }

    #[test]
    fn short_prefixed_input() {
        assert_eq!(parse_u32("0x1", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("0x", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("0x01", 16), Ok(1));
    }

    #[test]
    fn stray_characters() {
        assert_eq!(parse_u32("g10E", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("10gE", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("10Eg", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32(" 10", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("", 16), Err(Error::InvalidInput));
    }

    #[test]
    fn prefix_with_wrong_base() {
        assert_eq!(parse_u32("0x10", 10), Err(Error::InvalidInput));
        assert_eq!(parse_u32("1x10", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u32("ef", 10), Err(Error::InvalidInput));
    }

    #[test]
    fn unsupported_base() {
        assert_eq!(parse_u32("101", 2), Err(Error::UnsupportedBase(2)));
    }

    #[test]
    fn width() {
        assert_eq!(parse_u32("100000000", 16), Err(Error::InvalidInput));
        assert_eq!(parse_u16("0xFFFF", 16), Ok(0xFFFF));
        assert_eq!(parse_u16("0x10000", 16), Err(Error::InvalidInput));
    }
}
