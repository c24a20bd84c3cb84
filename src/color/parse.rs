//! Text tokens shared by the program grammars
//!
//! Colours are decimal or `0x`/`0X` hexadecimal; the keyword `random`
//! requests a fresh draw each time the colour is used. Numeric fields that
//! are missing or empty read as zero.

use core::str::FromStr;

use crate::error::Error;

const RANDOM_KEYWORD: &str = "random";

/// A parsed colour field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    /// Fixed colour value
    Value(u32),
    /// Resample on every use
    Random,
}

/// Parse one colour field
pub fn parse_color(field: &str) -> Result<ColorToken, Error> {
    let field = field.trim();
    if field.eq_ignore_ascii_case(RANDOM_KEYWORD) {
        return Ok(ColorToken::Random);
    }

    let value = match field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => field.parse::<u32>(),
    };
    value.map(ColorToken::Value).map_err(|_| Error::InvalidColor)
}

/// Parse an optional numeric field, treating a missing field as zero
pub fn parse_number<T: FromStr + Default>(field: Option<&str>) -> Result<T, Error> {
    match field.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => text.parse().map_err(|_| Error::InvalidNumber),
    }
}
