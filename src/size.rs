//! Size strings such as `512`, `64k` or `6m`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("empty size")]
    Empty,

    #[error("invalid size {0:?}")]
    Invalid(String),

    #[error("size {0:?} is too large")]
    Overflow(String),

    #[error("size must be greater than zero")]
    Zero,
}

/// Parses a decimal byte count with an optional `k`, `m` or `g` suffix
/// (powers of 1024, case-insensitive).
pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SizeError::Empty);
    }

    let (digits, multiplier) = match input.char_indices().last() {
        Some((idx, suffix)) if suffix.is_ascii_alphabetic() => {
            let multiplier = match suffix.to_ascii_lowercase() {
                'k' => 1u64 << 10,
                'm' => 1 << 20,
                'g' => 1 << 30,
                _ => return Err(SizeError::Invalid(input.to_string())),
            };
            (&input[..idx], multiplier)
        }
        _ => (input, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeError::Invalid(input.to_string()));
    }

    digits
        .parse::<u64>()
        .ok()
        .and_then(|value| value.checked_mul(multiplier))
        .ok_or_else(|| SizeError::Overflow(input.to_string()))
}

pub fn parse_nonzero_size(input: &str) -> Result<u64, SizeError> {
    match parse_size(input)? {
        0 => Err(SizeError::Zero),
        size => Ok(size),
    }
}
