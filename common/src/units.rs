//! conversion between size strings (`"512MB"`, `"1.5gb"`) and megabytes.

use std::num::ParseFloatError;

use thiserror::Error;

const KB: f64 = 1.0 / 1024.0;
const MB: f64 = 1.0;
const GB: f64 = 1024.0;
const TB: f64 = 1024.0 * 1024.0;

/// supported units, largest first, as a factor of one megabyte.
const UNITS: [(&str, f64); 4] = [("TB", TB), ("GB", GB), ("MB", MB), ("KB", KB)];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unsupported unit: {0}")]
    UnsupportedUnit(String),
    #[error("invalid number `{number}`")]
    InvalidNumber {
        number: String,
        #[source]
        source: ParseFloatError,
    },
}

/// parses a size string into megabytes.
///
/// the number is the leading run of digits and dots, everything after it is the unit.
/// units are case insensitive and may be separated from the number by whitespace.
pub fn parse_size(size: &str) -> Result<f64, Error> {
    let split = size
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(size.len());
    let (number, unit) = size.split_at(split);

    let value: f64 = number.parse().map_err(|source| Error::InvalidNumber {
        number: number.to_string(),
        source,
    })?;

    let unit = unit.trim();
    let factor = UNITS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(unit))
        .map(|&(_, factor)| factor)
        .ok_or_else(|| Error::UnsupportedUnit(unit.to_string()))?;

    Ok(value * factor)
}

/// formats megabytes with the largest unit that keeps the value at or above 1.
///
/// anything below a kilobyte is written in megabytes, so `0.0` becomes `"0.00MB"`.
pub fn format_size(megabytes: f64) -> String {
    for (unit, threshold) in UNITS {
        if megabytes >= threshold {
            return format!("{:.2}{unit}", megabytes / threshold);
        }
    }

    format!("{megabytes:.2}MB")
}
