//! Brazilian Portuguese number display: `1.234,50` and `47,5%`.

/// Fixed decimals, `,` as decimal separator, `.` between thousands groups.
/// Non-finite values render as zero.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push(',');
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// Two decimals, as in the sector table and chart tooltips.
pub fn format_number(value: f64) -> String {
    format_decimal(value, 2)
}

/// A fraction as a percentage with one decimal: `0.475` → `47,5%`.
pub fn format_percent(share: f64) -> String {
    format!("{}%", format_decimal(share * 100.0, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1234.5), "1.234,50");
        assert_eq!(format_number(1_234_567.891), "1.234.567,89");
        assert_eq!(format_number(999.999), "1.000,00");
        assert_eq!(format_number(12.0), "12,00");
    }

    #[test]
    fn signs_and_zero() {
        assert_eq!(format_number(-1500.0), "-1.500,00");
        assert_eq!(format_number(-0.001), "0,00");
        assert_eq!(format_number(f64::NAN), "0,00");
        assert_eq!(format_decimal(42.0, 0), "42");
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percent(0.475), "47,5%");
        assert_eq!(format_percent(1.0), "100,0%");
        assert_eq!(format_percent(0.0), "0,0%");
    }
}
