//! Localized year label grammar.
//!
//! # Responsibility
//! - Convert display labels such as `公元前221年` / `公元1949年` into signed
//!   integers used for chronological ordering.
//! - Provide the inverse formatter for tooling and tests.
//!
//! # Invariants
//! - Parsing is pure: the same label always yields the same value.
//! - A label without digits is a data bug and is reported, never coerced to 0.
//! - Grouping keys on the original label; the parsed value only orders.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Marker for "before common era" labels.
pub const BCE_MARKER: &str = "公元前";
/// Prefix marker for common-era labels.
pub const CE_MARKER: &str = "公元";
/// Trailing unit marker.
pub const YEAR_UNIT: &str = "年";

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Label could not be converted into a year number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearParseError {
    /// Original label as found on the record.
    pub label: String,
}

impl Display for YearParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed year label `{}`: no digits after stripping era markers", self.label)
    }
}

impl Error for YearParseError {}

/// Parses a localized year label into a signed year number.
///
/// BCE labels are negated. Era and unit markers are stripped before the
/// remaining text is read as digits.
///
/// # Errors
/// Returns [`YearParseError`] when the stripped label is not a run of digits.
pub fn parse_year(label: &str) -> Result<i64, YearParseError> {
    let trimmed = label.trim();
    let is_bce = trimmed.contains(BCE_MARKER);
    let stripped = trimmed
        .replace(BCE_MARKER, "")
        .replace(CE_MARKER, "")
        .replace(YEAR_UNIT, "");
    let digits = stripped.trim();

    if !DIGITS_RE.is_match(digits) {
        return Err(YearParseError {
            label: label.to_string(),
        });
    }

    let magnitude = digits.parse::<i64>().map_err(|_| YearParseError {
        label: label.to_string(),
    })?;
    Ok(if is_bce { -magnitude } else { magnitude })
}

/// Formats a signed year back into its display label.
pub fn format_year(year: i64) -> String {
    if year < 0 {
        format!("{BCE_MARKER}{}{YEAR_UNIT}", year.unsigned_abs())
    } else {
        format!("{CE_MARKER}{year}{YEAR_UNIT}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_year, parse_year};

    #[test]
    fn parses_bare_unit_label_without_era_prefix() {
        assert_eq!(parse_year("2023年").unwrap(), 2023);
    }

    #[test]
    fn rejects_label_without_digits() {
        let err = parse_year("公元年").unwrap_err();
        assert_eq!(err.label, "公元年");
    }

    #[test]
    fn rejects_mixed_garbage() {
        assert!(parse_year("公元19x9年").is_err());
    }

    #[test]
    fn rejects_non_ascii_digits() {
        let err = parse_year("公元١٤٥٢年").unwrap_err();
        assert_eq!(err.label, "公元١٤٥٢年");
        assert!(parse_year("公元１４５２年").is_err());
    }

    #[test]
    fn formats_both_eras() {
        assert_eq!(format_year(-221), "公元前221年");
        assert_eq!(format_year(1949), "公元1949年");
    }
}
