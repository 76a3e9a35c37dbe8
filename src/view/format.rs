use rust_decimal::prelude::*;
use serde_json::Number;

/// Formats `value` with exactly `digits` decimals, matching JavaScript's
/// `Number.prototype.toFixed`: the exact binary value is rounded, ties away from zero.
pub fn to_fixed(value: f64, digits: u32) -> String {
    // toFixed prints -0 as "0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    let precision = digits as usize;

    match Decimal::from_f64_retain(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", precision, rounded)
        }
        None => format!("{:.*}", precision, value),
    }
}

/// Table cell for a numeric field: two decimals, blank when missing.
pub fn fixed2(value: Option<f64>) -> String {
    value.map(|v| to_fixed(v, 2)).unwrap_or_default()
}

/// A number as JavaScript would interpolate it into a template string.
/// Magnitudes of 1e21 and above, or below 1e-6, switch to exponent form.
pub fn plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if value.is_nan() || (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponent = format!("{:e}", value);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exponent,
    }
}

/// `value ?? ''` for JSON numbers: missing is blank, zero stays "0".
pub fn plain_number(value: Option<&Number>) -> String {
    match value {
        None => String::new(),
        Some(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(plain).unwrap_or_default()
            }
        }
    }
}

/// `value ?? ''` for text fields.
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed2_pads_and_rounds() {
        assert_eq!(fixed2(Some(150.2)), "150.20");
        assert_eq!(fixed2(Some(151.0)), "151.00");
        assert_eq!(fixed2(Some(149.8)), "149.80");
        assert_eq!(fixed2(Some(1234.5678)), "1234.57");
        assert_eq!(fixed2(Some(-2.345678)), "-2.35");
    }

    #[test]
    fn test_fixed2_missing_is_blank() {
        assert_eq!(fixed2(None), "");
    }

    #[test]
    fn test_ties_follow_binary_value() {
        // 0.125 is exact in binary, so it is a true tie
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
        // 1.005 is stored as 1.00499999...
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_zero_and_negative_zero() {
        assert_eq!(fixed2(Some(0.0)), "0.00");
        assert_eq!(fixed2(Some(-0.0)), "0.00");
    }

    #[test]
    fn test_plain_matches_template_interpolation() {
        assert_eq!(plain(120000.0), "120000");
        assert_eq!(plain(150.5), "150.5");
        assert_eq!(plain(-5.0), "-5");
        assert_eq!(plain(-0.0), "0");
        assert_eq!(plain(0.000001), "0.000001");
    }

    #[test]
    fn test_plain_exponent_ranges() {
        assert_eq!(plain(1e21), "1e+21");
        assert_eq!(plain(1.5e22), "1.5e+22");
        assert_eq!(plain(1e-7), "1e-7");
        assert_eq!(plain(-2.5e-8), "-2.5e-8");
        assert_eq!(plain(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn test_plain_number_nullish() {
        assert_eq!(plain_number(None), "");
        assert_eq!(plain_number(Some(&Number::from(0))), "0");
        assert_eq!(plain_number(Some(&Number::from(1000))), "1000");
        let float = Number::from_f64(1000.0).unwrap();
        assert_eq!(plain_number(Some(&float)), "1000");
        let frac = Number::from_f64(12.5).unwrap();
        assert_eq!(plain_number(Some(&frac)), "12.5");
    }

    #[test]
    fn test_text() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some("buy")), "buy");
    }
}
