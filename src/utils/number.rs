//! Number parsing and formatting shared by the geometry code and the transforms.

use std::str::FromStr;

use svgtypes::{LengthListParser, Number, NumberListParser};

/// Reads the leading length of `value` and returns its number.
///
/// `"10px"` gives `10.0`, `"  .5em"` gives `0.5`, `"auto"` gives `None`.
pub fn parse_leading_number(value: &str) -> Option<f64> {
    LengthListParser::from(value).next()?.ok().map(|length| length.number)
}

/// Numbers of a comma and/or whitespace separated list, up to the first
/// malformed entry.
pub fn parse_number_list(value: &str) -> impl Iterator<Item = f64> + '_ {
    NumberListParser::from(value).map_while(Result::ok)
}

/// Every token of a comma and/or whitespace separated list, `None` where a
/// token is not a finite number.
pub fn parse_number_tokens(value: &str) -> Vec<Option<f64>> {
    value
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| Number::from_str(token).ok().map(|n| n.0))
        .collect()
}

/// Formats a number the way it is written back into attributes.
///
/// Integral values print without a fractional part and negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Rounds `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
