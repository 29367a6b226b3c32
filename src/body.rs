#[cfg(not(feature = "std"))]
use core as std;

use crate::{MAX_BODY_DIGITS, ROTATION, ROW_MULTIPLIER};
use fstr::FStr;
use std::{error, fmt, str};

/// Digit characters used in the Base62 notation.
///
/// The order matters: tokens computed elsewhere must decode to the same value.
const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// An O(1) map from ASCII code points to Base62 digit values.
const DECODE_MAP: [u8; 256] = {
    let mut map = [0xff; 256];
    let mut i = 0;
    while i < DIGITS.len() {
        map[DIGITS[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Represents the 64-bit value behind a token body and provides the Base62 codec.
///
/// # Examples
///
/// ```rust
/// use randomish::TokenBody;
///
/// let x = TokenBody::from_parts(1_700_000_000_000_000, 42);
/// assert_eq!(x.to_u64(), 1300431035552498437);
/// assert_eq!(x.encode(), "1Y3zFdcco6v");
/// assert_eq!(x.epoch_micros(42), 1_700_000_000_000_000);
///
/// let y = "1Y3zFdcco6v".parse::<TokenBody>()?;
/// assert_eq!(x, y);
/// # Ok::<(), randomish::ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[repr(transparent)]
pub struct TokenBody(u64);

impl TokenBody {
    /// Creates an object from a 64-bit unsigned integer.
    pub const fn from_u64(int_value: u64) -> Self {
        Self(int_value)
    }

    /// Returns the 64-bit unsigned integer representation.
    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Mixes a row ID into a microsecond timestamp and diffuses the result.
    ///
    /// The row ID is reinterpreted as `u64`, multiplied by [`ROW_MULTIPLIER`] with wrapping
    /// arithmetic, XORed with `epoch_micros`, and the result is rotated left by [`ROTATION`] bits.
    pub const fn from_parts(epoch_micros: u64, row_id: i64) -> Self {
        Self((epoch_micros ^ row_term(row_id)).rotate_left(ROTATION))
    }

    /// Recovers the microsecond timestamp this body was made from, given the row ID.
    ///
    /// This is the inverse of [`TokenBody::from_parts`]; supplying a different row ID yields an
    /// unrelated value.
    pub const fn epoch_micros(self, row_id: i64) -> u64 {
        self.0.rotate_right(ROTATION) ^ row_term(row_id)
    }

    /// Creates an object from a Base62 string of 1 to 11 digits.
    ///
    /// Both the canonical form and the zero-padded form returned by [`TokenBody::encode`] are
    /// accepted. Digits are case-sensitive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use randomish::TokenBody;
    ///
    /// let x = TokenBody::try_from_str("10")?;
    /// let y = TokenBody::try_from_str("00000000010")?;
    /// assert_eq!(x.to_u64(), 62);
    /// assert_eq!(x, y);
    /// # Ok::<(), randomish::ParseError>(())
    /// ```
    pub const fn try_from_str(str_value: &str) -> Result<Self, ParseError> {
        let bs = str_value.as_bytes();
        if bs.is_empty() || bs.len() > MAX_BODY_DIGITS {
            return Err(ParseError::invalid_length(bs.len()));
        }

        let mut int_value = 0u64;
        let mut i = 0;
        while i < bs.len() {
            let n = DECODE_MAP[bs[i] as usize];
            if n == 0xff {
                return Err(ParseError::invalid_digit(str_value, i));
            }
            int_value = match int_value.checked_mul(62) {
                Some(int_value) => match int_value.checked_add(n as u64) {
                    Some(int_value) => int_value,
                    _ => return Err(ParseError::out_of_u64_range()),
                },
                _ => return Err(ParseError::out_of_u64_range()),
            };
            i += 1;
        }
        Ok(Self(int_value))
    }

    /// Returns the 11-digit zero-padded string representation stored in a stack-allocated
    /// string-like type that can be handled like [`String`] through common traits.
    ///
    /// Use this when a fixed-width body is needed. The [`Display`](fmt::Display) implementation
    /// returns the canonical form without leading zeros.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use randomish::TokenBody;
    ///
    /// let x = TokenBody::from_u64(62);
    /// assert_eq!(x.encode(), "00000000010");
    /// assert_eq!(x.to_string(), "10");
    /// ```
    pub const fn encode(&self) -> FStr<MAX_BODY_DIGITS> {
        let mut dst = [b'0'; MAX_BODY_DIGITS];
        let mut i = dst.len();
        let mut int_value = self.0;
        while int_value > 0 {
            i -= 1;
            dst[i] = DIGITS[(int_value % 62) as usize];
            int_value /= 62;
        }

        // SAFETY: All bytes in `dst` are valid ASCII characters.
        unsafe { FStr::from_inner_unchecked(dst) }
    }
}

const fn row_term(row_id: i64) -> u64 {
    (row_id as u64).wrapping_mul(ROW_MULTIPLIER)
}

/// Strips the zero padding off a string returned by [`TokenBody::encode`], keeping at least one
/// digit.
pub(crate) fn trim_padding(padded: &str) -> &str {
    let trimmed = padded.trim_start_matches('0');
    if trimmed.is_empty() {
        &padded[padded.len() - 1..]
    } else {
        trimmed
    }
}

impl From<u64> for TokenBody {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<TokenBody> for u64 {
    fn from(object: TokenBody) -> Self {
        object.to_u64()
    }
}

impl str::FromStr for TokenBody {
    type Err = ParseError;

    /// Creates an object from a Base62 string of 1 to 11 digits.
    fn from_str(str_value: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(str_value)
    }
}

impl fmt::Display for TokenBody {
    /// Returns the canonical Base62 representation without leading zeros.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use randomish::TokenBody;
    ///
    /// let x = TokenBody::from_u64(8388608);
    /// assert_eq!(format!("{}", x), "ZCG8");
    /// assert_eq!(format!("{:>6}", x), "  ZCG8");
    /// assert_eq!(format!("{}", TokenBody::from_u64(0)), "0");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(trim_padding(&self.encode()), f)
    }
}

/// An error parsing an invalid token or token body string.
#[derive(Clone, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
}

#[derive(Clone, Eq, PartialEq, Debug)]
enum ParseErrorKind {
    InvalidLength {
        n_bytes: usize,
    },
    InvalidDigit {
        /// Holds the invalid character as a UTF-8 byte array to work in the const context.
        utf8_char: [u8; 4],
        position: usize,
    },
    OutOfU64Range,
    MissingAffix,
}

impl ParseError {
    /// Creates an `InvalidLength` variant from the actual length.
    const fn invalid_length(n_bytes: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidLength { n_bytes },
        }
    }

    /// Creates an `InvalidDigit` variant from the entire string and the position of invalid digit.
    const fn invalid_digit(src: &str, position: usize) -> Self {
        const fn is_char_boundary(utf8_bytes: &[u8], index: usize) -> bool {
            match index {
                0 => true,
                i if i < utf8_bytes.len() => (utf8_bytes[i] as i8) >= -64,
                _ => index == utf8_bytes.len(),
            }
        }

        let bs = src.as_bytes();
        let mut utf8_char = [bs[position], 0, 0, 0];

        let mut i = 1;
        while i < 4 && !is_char_boundary(bs, position + i) {
            utf8_char[i] = bs[position + i];
            i += 1;
        }

        Self {
            kind: ParseErrorKind::InvalidDigit {
                utf8_char,
                position,
            },
        }
    }

    /// Creates an `OutOfU64Range` variant.
    const fn out_of_u64_range() -> Self {
        Self {
            kind: ParseErrorKind::OutOfU64Range,
        }
    }

    /// Creates a `MissingAffix` variant.
    #[cfg_attr(not(feature = "std"), allow(dead_code))]
    pub(crate) const fn missing_affix() -> Self {
        Self {
            kind: ParseErrorKind::MissingAffix,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse string as token: ")?;
        match self.kind {
            ParseErrorKind::InvalidLength { n_bytes } => {
                write!(f, "invalid length: {} bytes (expected 1 to 11)", n_bytes)
            }
            ParseErrorKind::InvalidDigit {
                utf8_char,
                position,
            } => {
                let chr = str::from_utf8(&utf8_char)
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                write!(f, "invalid digit '{}' at {}", chr.escape_debug(), position)
            }
            ParseErrorKind::OutOfU64Range => write!(f, "out of 64-bit value range"),
            ParseErrorKind::MissingAffix => write!(f, "missing prefix or suffix"),
        }
    }
}

impl error::Error for ParseError {}

#[cfg(feature = "std")]
mod with_std {
    use super::{ParseError, TokenBody};

    impl TryFrom<String> for TokenBody {
        type Error = ParseError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            Self::try_from_str(&value)
        }
    }

    impl From<TokenBody> for String {
        fn from(object: TokenBody) -> Self {
            object.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TokenBody;

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        let cases: &[(u64, &str, &str)] = &[
            (0, "0", "00000000000"),
            (1, "1", "00000000001"),
            (10, "A", "0000000000A"),
            (35, "Z", "0000000000Z"),
            (36, "a", "0000000000a"),
            (37, "b", "0000000000b"),
            (61, "z", "0000000000z"),
            (62, "10", "00000000010"),
            (3843, "zz", "000000000zz"),
            (8388608, "ZCG8", "0000000ZCG8"),
            (1300431035552498437, "1Y3zFdcco6v", "1Y3zFdcco6v"),
            (u64::MAX, "LygHa16AHYF", "LygHa16AHYF"),
        ];

        for &(int_value, canonical, padded) in cases {
            let x = TokenBody::from_u64(int_value);
            assert_eq!(&x.encode() as &str, padded);
            #[cfg(feature = "std")]
            assert_eq!(x.to_string(), canonical);

            assert_eq!(TokenBody::try_from_str(canonical).unwrap(), x);
            assert_eq!(TokenBody::try_from_str(padded).unwrap(), x);
            assert_eq!(super::trim_padding(&x.encode()), canonical);
        }
    }

    /// Mixes and rotates prepared cases correctly
    #[test]
    fn mixes_and_rotates_prepared_cases_correctly() {
        let cases: &[((u64, i64), u64)] = &[
            ((0, 0), 0),
            ((1, 0), 1 << 23),
            ((37, 1), 0),
            ((0, 1), 310378496),
            ((0, i64::MIN), 1 << 22),
            ((1_700_000_000_000_000, 42), 1300431035552498437),
            ((1_700_000_000_000_000, 43), 1300431035862876933),
            ((1_700_000_000_000_000, 0), 1300431022516601605),
            ((1_700_000_000_000_000, -1), 17146313050890960122),
            ((1_767_225_600_000_000, 1), 11827314776340431651),
            ((u64::MAX, 0), u64::MAX),
        ];

        for &((epoch_micros, row_id), int_value) in cases {
            let x = TokenBody::from_parts(epoch_micros, row_id);
            assert_eq!(x.to_u64(), int_value);
            assert_eq!(x.epoch_micros(row_id), epoch_micros);
        }
    }

    /// Recovers the timestamp from random bodies
    #[test]
    fn recovers_the_timestamp_from_random_bodies() {
        use rand09::{rngs::StdRng, Rng as _, SeedableRng as _};

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let epoch_micros = rng.random::<u64>();
            let row_id = rng.random::<i64>();
            let x = TokenBody::from_parts(epoch_micros, row_id);
            assert_eq!(x.epoch_micros(row_id), epoch_micros);
            assert_eq!(TokenBody::try_from_str(&x.encode()).unwrap(), x);
        }
    }

    /// Returns error if an invalid string representation is supplied
    #[test]
    fn returns_error_if_an_invalid_string_representation_is_supplied() {
        use super::ParseErrorKind::{self, *};
        fn invalid_digit(c: char, position: usize) -> ParseErrorKind {
            let mut utf8_char = [0u8; 4];
            c.encode_utf8(&mut utf8_char);
            InvalidDigit {
                utf8_char,
                position,
            }
        }

        let cases = [
            ("", InvalidLength { n_bytes: 0 }),
            ("000000000000", InvalidLength { n_bytes: 12 }),
            (" 1Y3zFdcco6v", InvalidLength { n_bytes: 12 }),
            ("1Y3zFdcco6v ", InvalidLength { n_bytes: 12 }),
            (" 1Y3z", invalid_digit(' ', 0)),
            ("+1Y3z", invalid_digit('+', 0)),
            ("-1Y3z", invalid_digit('-', 0)),
            ("1Y3z-dcco6v", invalid_digit('-', 4)),
            ("1Y3zFdcco_v", invalid_digit('_', 9)),
            ("1Y3z\tdcco6v", invalid_digit('\t', 4)),
            ("ab\u{6f22}", invalid_digit('\u{6f22}', 2)),
            ("\u{1f923}ab", invalid_digit('\u{1f923}', 0)),
            ("\u{6f22}\u{5b57}\u{6f22}\u{5b57}", InvalidLength { n_bytes: 12 }),
            ("LygHa16AHYG", OutOfU64Range),
            ("zzzzzzzzzzz", OutOfU64Range),
        ];

        for e in cases {
            let result = e.0.parse::<TokenBody>();
            assert!(result.is_err());
            assert_eq!(result.unwrap_err().kind, e.1);
        }
    }

    /// Treats upper and lower case digits as distinct values
    #[test]
    fn treats_upper_and_lower_case_digits_as_distinct_values() {
        let upper = TokenBody::try_from_str("A").unwrap();
        let lower = TokenBody::try_from_str("a").unwrap();
        assert_eq!(upper.to_u64(), 10);
        assert_eq!(lower.to_u64(), 36);
        assert_ne!(upper, lower);
    }

    /// Supports comparison operators consistent with the numeric value
    #[test]
    fn supports_comparison_operators_consistent_with_the_numeric_value() {
        let ordered = [0, 1, 61, 62, 3843, 8388608, u64::MAX >> 1, u64::MAX];

        let mut prev = TokenBody::from(ordered[0]);
        for &int_value in &ordered[1..] {
            let curr = TokenBody::from(int_value);
            assert_ne!(curr, prev);
            assert!(curr > prev);
            assert!(prev <= curr);
            assert_eq!(u64::from(curr), int_value);

            // the padded form sorts like the value; the canonical form does not in general
            assert!(curr.encode().as_str() > prev.encode().as_str());
            prev = curr;
        }
    }

    /// Describes errors in human-readable messages
    #[cfg(feature = "std")]
    #[test]
    fn describes_errors_in_human_readable_messages() {
        let cases = [
            ("", "invalid length: 0 bytes (expected 1 to 11)"),
            ("1Y3z-dcco6v", "invalid digit '-' at 4"),
            ("ab\u{6f22}", "invalid digit '\u{6f22}' at 2"),
            ("zzzzzzzzzzz", "out of 64-bit value range"),
        ];

        for (src, message) in cases {
            let err = src.parse::<TokenBody>().unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("could not parse string as token: {}", message)
            );
        }
    }
}

#[cfg(feature = "serde")]
mod with_serde {
    use super::{fmt, str, trim_padding, TokenBody};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for TokenBody {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(trim_padding(&self.encode()))
            } else {
                serializer.serialize_u64(self.to_u64())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for TokenBody {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_u64(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl de::Visitor<'_> for VisitorImpl {
        type Value = TokenBody;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a token body representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::try_from_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            match str::from_utf8(value) {
                Ok(str_value) => self.visit_str(str_value),
                Err(err) => Err(de::Error::custom(err)),
            }
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Self::Value::from_u64(value))
        }
    }

}
