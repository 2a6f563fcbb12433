use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid price value: {0:?}")]
pub struct PriceError(pub String);

/// Turn a localized price string into a canonical amount: strip thousands
/// separators, parse, round to 2 fractional digits. Zero and arbitrarily
/// large amounts are valid; anything non-numeric or negative is not.
pub fn normalize(raw: &str) -> Result<f64, PriceError> {
    let cleaned = raw.replace(',', "");
    let value: f64 = cleaned.parse().map_err(|_| PriceError(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(PriceError(raw.to_string()));
    }
    Ok((value * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(normalize("1,234.00").unwrap(), 1234.00);
        assert_eq!(normalize("1,000").unwrap(), 1000.0);
        assert_eq!(normalize("12,345,678").unwrap(), 12_345_678.0);
    }

    #[test]
    fn rounds_to_two_digits() {
        assert_eq!(normalize("99.999").unwrap(), 100.0);
        assert_eq!(normalize("0.005").unwrap(), 0.01);
    }

    #[test]
    fn zero_is_valid() {
        assert_eq!(normalize("0").unwrap(), 0.0);
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(normalize("abc").is_err());
        assert!(normalize("").is_err());
        assert!(normalize("12.3.4").is_err());
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(normalize("-5").is_err());
        assert!(normalize("nan").is_err());
        assert!(normalize("inf").is_err());
    }

    #[test]
    fn error_keeps_the_raw_input() {
        assert_eq!(normalize("abc").unwrap_err(), PriceError("abc".into()));
    }
}
