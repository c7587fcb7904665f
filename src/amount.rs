//! Parsing and rendering of user-facing amount strings.
//!
//! Amounts are typed with dots as thousands separators ("50.000" and "50000"
//! are the same number), so parsing is isolated here and the composer only
//! ever sees typed integers.

use crate::error::ValidationError;

/// Parse a user-supplied amount string into minor currency units.
///
/// Dots and whitespace are stripped before parsing, so "50.000", " 50000 "
/// and "50 000" all read as 50000. A blank input parses to 0, which lets an
/// untouched fee field mean "no fee"; callers that require a positive amount
/// reject the 0 themselves.
///
/// # Errors
/// Returns [ValidationError::NotANumber] if anything other than an optional
/// sign and digits remains after stripping.
pub fn parse_amount(input: &str) -> Result<i64, ValidationError> {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(0);
    }

    cleaned
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            input: input.trim().to_owned(),
        })
}

/// Render an amount in minor currency units as a rupiah string with dot
/// thousands separators, e.g. `Rp 50.000` or `-Rp 2.500`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}
