//! Colon-separated duration strings.
//!
//! Start offsets, explicit durations and end times are written as
//! `hours:minutes:seconds`, with leading components optional (`"1:30"` is
//! ninety seconds, `"45"` is forty-five). Every component may be fractional.

use crate::error::BcameraError;

/// Parse an `H:M:S`, `M:S` or `S` string into a total number of seconds.
///
/// # Errors
///
/// Returns [`BcameraError::InvalidDuration`] for empty input, more than three
/// components, or a component that is not written as digits with an optional
/// `.digits` fraction. Signs, exponents and bare fractions (`.5`) are
/// rejected because the string is handed to the transcoder unchanged.
///
/// # Example
///
/// ```
/// assert_eq!(bcamera::timecode::parse_seconds("01:02:03").unwrap(), 3723.0);
/// assert_eq!(bcamera::timecode::parse_seconds("00:30").unwrap(), 30.0);
/// assert_eq!(bcamera::timecode::parse_seconds("1:02.5").unwrap(), 62.5);
/// ```
pub fn parse_seconds(value: &str) -> Result<f64, BcameraError> {
    let trimmed = value.trim();
    let invalid = || BcameraError::InvalidDuration(value.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let mut total = 0.0;
    for (power, part) in parts.iter().rev().enumerate() {
        if !is_plain_decimal(part) {
            return Err(invalid());
        }
        let component = part.parse::<f64>().map_err(|_| invalid())?;
        if !component.is_finite() {
            return Err(invalid());
        }
        total += component * 60_f64.powi(power as i32);
    }

    Ok(total)
}

fn is_plain_decimal(component: &str) -> bool {
    let (whole, fraction) = match component.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (component, None),
    };
    let digits = |text: &str| !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

/// Render a second count the way it is handed to the transcoder.
///
/// Whole numbers print without a decimal point; fractional values keep up to
/// millisecond precision with trailing zeros removed.
pub fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        return format!("{}", seconds as i64);
    }

    let rendered = format!("{seconds:.3}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_seconds, parse_seconds};

    #[test]
    fn rejects_too_many_components() {
        assert!(parse_seconds("1:2:3:4").is_err());
    }

    #[test]
    fn rejects_negative_component() {
        assert!(parse_seconds("-5").is_err());
        assert!(parse_seconds("1:-5").is_err());
    }

    #[test]
    fn rejects_non_decimal_notation() {
        for value in ["1e3", "+5", ".5", "5.", "1:2e1", "inf", "NaN", "1: 30"] {
            assert!(parse_seconds(value).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn formats_whole_and_fractional() {
        assert_eq!(format_seconds(90.0), "90");
        assert_eq!(format_seconds(12.5), "12.5");
        assert_eq!(format_seconds(0.125), "0.125");
    }
}
