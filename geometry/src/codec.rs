use crate::DecodeError;

/// Maps one character of the 64-symbol alphabet to its value.
pub fn decode_symbol(c: u8) -> Result<u8, DecodeError> {
    match c {
        b'A'..=b'Z' => Ok(c - b'A'),
        b'a'..=b'z' => Ok(c - b'a' + 26),
        b'0'..=b'9' => Ok(c - b'0' + 52),
        b'+' => Ok(62),
        b'/' => Ok(63),
        _ => Err(DecodeError::InvalidSymbol(c as char)),
    }
}

/// Reads a group of base-64 digits, least significant first.
pub(crate) fn decode_digits(digits: &[u8]) -> Result<i64, DecodeError> {
    let mut value = 0;
    for (i, c) in digits.iter().enumerate() {
        value += i64::from(decode_symbol(*c)?) << (6 * i);
    }
    Ok(value)
}
