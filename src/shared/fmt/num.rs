//! Number formatting for prices.
//!
//! Two styles, both with comma thousands separators:
//! - [`display_locale`]: up to three fraction digits, trailing zeros trimmed
//!   (price cards).
//! - [`display_usd`]: dollar sign and exactly two fraction digits (tables).

/// Inserts thousands separators into the integer part of an already
/// formatted decimal string. The fraction part is left untouched.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn trim_fraction(formatted: String) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Format a price the way a card shows it: `42000.5` → `"42,000.5"`.
pub fn display_locale(amount: f64) -> String {
    let formatted = trim_fraction(format!("{:.3}", amount));
    let formatted = if formatted == "-0" { "0".to_string() } else { formatted };
    group_thousands(&formatted)
}

/// Format a price as US dollars: `42000.0` → `"$42,000.00"`.
pub fn display_usd(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let negative = amount < 0.0 && formatted != "0.00";
    format!(
        "{}${}",
        if negative { "-" } else { "" },
        group_thousands(&formatted)
    )
}
