//! Prefix-consuming building blocks shared by the timestamp and duration grammars.
//!
//! Every helper takes the remaining input and returns the recognized value together
//! with the input left after it.

use std::iter;

/// A violation of one of the fixed grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub(crate) struct SyntaxError(pub(crate) &'static str);

pub(crate) fn ensure_complete<T, E: From<SyntaxError>>(
    input: &str,
    parse: impl FnOnce(&str) -> Result<(T, &str), E>,
) -> Result<T, E> {
    let (result, left) = parse(input)?;
    if !left.is_empty() {
        return Err(SyntaxError("Unrecognized value suffix").into());
    }
    Ok(result)
}

pub(crate) fn expect_char<'a>(
    input: &'a str,
    constant: char,
    error_message: &'static str,
) -> Result<&'a str, SyntaxError> {
    input.strip_prefix(constant).ok_or(SyntaxError(error_message))
}

/// Runs `parse` only if the input starts with `marker`, the marker being consumed.
pub(crate) fn optional<'a, T, E>(
    input: &'a str,
    marker: char,
    parse: impl FnOnce(&'a str) -> Result<(T, &'a str), E>,
) -> Result<(Option<T>, &'a str), E> {
    Ok(if let Some(left) = input.strip_prefix(marker) {
        let (result, left) = parse(left)?;
        (Some(result), left)
    } else {
        (None, input)
    })
}

/// Splits the longest prefix only made of ASCII digits.
pub(crate) fn digits(input: &str) -> (&str, &str) {
    let end = input
        .bytes()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(input.len());
    input.split_at(end)
}

pub(crate) fn two_digits<'a>(
    input: &'a str,
    error_message: &'static str,
) -> Result<(u8, &'a str), SyntaxError> {
    match input.as_bytes() {
        [a, b, ..] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Ok(((a - b'0') * 10 + (b - b'0'), &input[2..]))
        }
        _ => Err(SyntaxError(error_message)),
    }
}

pub(crate) fn four_digits<'a>(
    input: &'a str,
    error_message: &'static str,
) -> Result<(u16, &'a str), SyntaxError> {
    let Some(number) = input.as_bytes().get(..4) else {
        return Err(SyntaxError(error_message));
    };
    if !number.iter().all(u8::is_ascii_digit) {
        return Err(SyntaxError(error_message));
    }
    let value = number
        .iter()
        .fold(0, |acc, c| acc * 10 + u16::from(c - b'0'));
    Ok((value, &input[4..]))
}

/// Reads the digits following a decimal point as an integer number of `10^-scale` units.
///
/// At least one digit is required. Missing digits are zeros and digits after the `scale`-th
/// one are dropped without rounding.
pub(crate) fn fraction(input: &str, scale: usize) -> Result<(u32, &str), SyntaxError> {
    let (number, input) = digits(input);
    if number.is_empty() {
        return Err(SyntaxError(
            "A decimal point must be followed by at least one digit",
        ));
    }
    let value = number
        .bytes()
        .chain(iter::repeat(b'0'))
        .take(scale)
        .fold(0, |acc, c| acc * 10 + u32::from(c - b'0'));
    Ok((value, input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_prefixes() -> Result<(), SyntaxError> {
        assert_eq!(digits("123abc"), ("123", "abc"));
        assert_eq!(digits("abc"), ("", "abc"));
        assert_eq!(digits("42"), ("42", ""));
        assert_eq!(two_digits("07:", "")?, (7, ":"));
        assert_eq!(four_digits("20140", "")?, (2014, "0"));
        two_digits("7:", "bad").unwrap_err();
        four_digits("201", "bad").unwrap_err();
        four_digits("20a4", "bad").unwrap_err();
        Ok(())
    }

    #[test]
    fn fractions() -> Result<(), SyntaxError> {
        assert_eq!(fraction("1", 6)?, (100_000, ""));
        assert_eq!(fraction("321Z", 6)?, (321_000, "Z"));
        assert_eq!(fraction("1234567", 6)?, (123_456, ""));
        assert_eq!(fraction("999999999", 6)?, (999_999, ""));
        assert_eq!(fraction("5S", 9)?, (500_000_000, "S"));
        assert_eq!(
            fraction("S", 9),
            Err(SyntaxError(
                "A decimal point must be followed by at least one digit"
            ))
        );
        Ok(())
    }

    fn hour(input: &str) -> Result<(u8, &str), SyntaxError> {
        two_digits(input, "bad hour")
    }

    #[test]
    fn optional_parts() -> Result<(), SyntaxError> {
        assert_eq!(optional("T12", 'T', hour)?, (Some(12), ""));
        assert_eq!(optional("12", 'T', hour)?, (None, "12"));
        assert_eq!(
            optional("T1", 'T', hour),
            Err(SyntaxError("bad hour"))
        );
        assert_eq!(
            ensure_complete("T12x", |input| optional(input, 'T', hour)),
            Err(SyntaxError("Unrecognized value suffix"))
        );
        assert_eq!(
            ensure_complete("T12", |input| optional(input, 'T', hour)),
            Ok(Some(12))
        );
        Ok(())
    }
}
