use std::sync::OnceLock;

use regex::Regex;

/// Leading float the way a lenient parser reads it: optional sign, digits,
/// optional fraction. Anything after the match is ignored.
fn leading_float() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").expect("Hardcode regex pattern"))
}

/// Parse a cell whose locale is unknown (`1.234,56`, `1,234.56`, `1234`).
///
/// Whichever of `,` / `.` appears last is the decimal separator and the other
/// one is dropped as a thousands separator. A lone `,` is therefore always a
/// decimal comma: `"1,234"` is `1.234`, and so is `"1.234"`.
///
/// Never fails: unreadable input is `0.0`.
pub fn parse_localized_number(raw: &str) -> f64 {
    let clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if clean.is_empty() {
        return 0.0;
    }

    let last_comma = clean.rfind(',');
    let last_dot = clean.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(comma), dot) if dot.map_or(true, |d| comma > d) => {
            let mut s = clean.replace('.', "");
            if let Some(i) = s.rfind(',') {
                s.replace_range(i..=i, ".");
            }
            s
        }
        (_, Some(_)) => clean.replace(',', ""),
        _ => clean,
    };

    leading_float()
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decimal_comma() {
        assert!(close(parse_localized_number("1234,5"), 1234.5));
        assert!(close(parse_localized_number("-3,25"), -3.25));
    }

    #[test]
    fn dot_thousands_comma_decimal() {
        assert!(close(parse_localized_number("1.234,56"), 1234.56));
        assert!(close(parse_localized_number("1.234.567,8"), 1_234_567.8));
    }

    #[test]
    fn comma_thousands_dot_decimal() {
        assert!(close(parse_localized_number("1,234.56"), 1234.56));
    }

    #[test]
    fn lone_comma_is_a_decimal_separator() {
        assert!(close(parse_localized_number("1,234"), 1.234));
    }

    #[test]
    fn lone_dot_is_a_decimal_separator() {
        assert!(close(parse_localized_number("1.234"), 1.234));
    }

    #[test]
    fn units_and_currency_are_stripped() {
        assert!(close(parse_localized_number("R$ 1.500,00"), 1500.0));
        assert!(close(parse_localized_number(" 12 m² "), 12.0));
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(parse_localized_number(""), 0.0);
        assert_eq!(parse_localized_number("   "), 0.0);
        assert_eq!(parse_localized_number("n/a"), 0.0);
        assert_eq!(parse_localized_number("-"), 0.0);
        assert_eq!(parse_localized_number(",."), 0.0);
    }

    #[test]
    fn trailing_noise_after_a_number_is_ignored() {
        assert!(close(parse_localized_number("12-5"), 12.0));
        assert!(close(parse_localized_number("1.2.3"), 1.2));
    }
}
