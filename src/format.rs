//! Number-to-string formatting for display columns and metrics.

/// `40.0%`
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `$85.50`; missing means render as `n/a`
pub fn currency(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("${value:.2}"),
        None => "n/a".to_string(),
    }
}

/// Two decimals, unitless.
pub fn two_decimals(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

/// General format with `digits` significant digits, trailing zeros removed.
/// Switches to exponent notation for very large or small magnitudes.
pub fn significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// `12.5 days`
pub fn days(value: f64) -> String {
    format!("{} days", significant(value, 3))
}

/// Label drawn above a bar: `T: 40.0%`. The prefix defaults to the first
/// letter of the labelled column.
pub fn bar_label(column: &str, value: &str, prefix: Option<&str>) -> String {
    let prefix = match prefix {
        Some(prefix) => prefix.to_string(),
        None => column
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default(),
    };
    format!("{prefix}: {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(40.0), "40.0%");
        assert_eq!(percent(100.0 / 3.0), "33.3%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn currency_and_missing() {
        assert_eq!(currency(Some(85.5)), "$85.50");
        assert_eq!(currency(None), "n/a");
        assert_eq!(two_decimals(Some(3.456)), "3.46");
    }

    #[test]
    fn significant_matches_general_format() {
        assert_eq!(significant(33.33333, 4), "33.33");
        assert_eq!(significant(40.0, 4), "40");
        assert_eq!(significant(12.55, 3), "12.6");
        assert_eq!(significant(0.5, 3), "0.5");
        assert_eq!(significant(1234.0, 3), "1.23e+03");
        assert_eq!(significant(0.00001234, 3), "1.23e-05");
        assert_eq!(significant(999.6, 3), "1e+03");
        assert_eq!(significant(f64::INFINITY, 3), "inf");
        assert_eq!(significant(f64::NAN, 3), "nan");
    }

    #[test]
    fn day_counts() {
        assert_eq!(days(7.25), "7.25 days");
        assert_eq!(days(14.0), "14 days");
    }

    #[test]
    fn bar_label_prefix_defaults_to_initial() {
        assert_eq!(bar_label("Total Responses", "40.0%", None), "T: 40.0%");
        assert_eq!(bar_label("Real Responses", "20.0%", Some("R")), "R: 20.0%");
    }
}
