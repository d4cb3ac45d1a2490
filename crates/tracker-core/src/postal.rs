/// Normalize a postal code that may have been stored as a float.
///
/// `"33101.0"` becomes `"33101"`. Anything that does not parse as a finite
/// number is returned unchanged, so the function never fails.
///
/// # Examples
///
/// ```
/// use tracker_core::postal::normalize_postal_code;
///
/// assert_eq!(normalize_postal_code("33101.0"), "33101");
/// assert_eq!(normalize_postal_code("N/A"), "N/A");
/// assert_eq!(normalize_postal_code(&33101), "33101");
/// ```
pub fn normalize_postal_code<T: ToString + ?Sized>(value: &T) -> String {
    let raw = value.to_string();
    match raw.trim().parse::<f64>() {
        // Adding 0.0 turns a truncated -0.0 into 0.0.
        Ok(f) if f.is_finite() => format!("{:.0}", f.trunc() + 0.0),
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_zero_decimal() {
        assert_eq!(normalize_postal_code("33101.0"), "33101");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(normalize_postal_code("N/A"), "N/A");
        assert_eq!(normalize_postal_code(""), "");
        assert_eq!(normalize_postal_code("33101-1234"), "33101-1234");
    }

    #[test]
    fn test_integer_input() {
        assert_eq!(normalize_postal_code(&33101), "33101");
        assert_eq!(normalize_postal_code(&33101_u64), "33101");
    }

    #[test]
    fn test_float_input() {
        assert_eq!(normalize_postal_code(&33101.0_f64), "33101");
    }

    #[test]
    fn test_already_clean() {
        assert_eq!(normalize_postal_code("32801"), "32801");
    }

    #[test]
    fn test_fraction_truncates() {
        assert_eq!(normalize_postal_code("33101.9"), "33101");
        assert_eq!(normalize_postal_code("-3.7"), "-3");
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(normalize_postal_code(" 33101.0 "), "33101");
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert_eq!(normalize_postal_code("nan"), "nan");
        assert_eq!(normalize_postal_code("inf"), "inf");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(normalize_postal_code("-0.0"), "0");
        assert_eq!(normalize_postal_code("-0.4"), "0");
    }

    #[test]
    fn test_leading_zero_lost_like_numeric_storage() {
        // A zip stored as a number has already lost its leading zero.
        assert_eq!(normalize_postal_code("02134.0"), "2134");
    }
}
