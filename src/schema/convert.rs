//! Raw value coercion.

/// A value as it appears in a configuration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    /// A bare key with no assignment.
    Flag,
    /// Assigned text.
    Text(&'a str),
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        RawValue::Text(text)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(text: &'a String) -> Self {
        RawValue::Text(text)
    }
}

/// Boolean coercion: only `""`, `"0"` and `"false"` are false.
pub fn coerce_bool(text: &str) -> bool {
    !matches!(text, "" | "0" | "false")
}

/// Numeric coercion. Never fails; unparseable text gives `NaN`.
///
/// Accepts surrounding whitespace, decimal and exponent forms, `0x`/`0o`/`0b`
/// integer prefixes and a signed `Infinity`. Blank text is zero.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in RADIX_PREFIXES {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // f64::from_str also takes "inf" and "nan"; keep to plain decimal forms.
    let decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal {
        return f64::NAN;
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

const RADIX_PREFIXES: [(&str, u32); 6] = [
    ("0x", 16),
    ("0X", 16),
    ("0o", 8),
    ("0O", 8),
    ("0b", 2),
    ("0B", 2),
];

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}
