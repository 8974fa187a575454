//! Console formatting helpers for reports.

/// Formats an amount as dollars with thousands separators and two decimals.
///
/// Negative amounts are written as `-$1,234.50`. Amounts that round to zero
/// are never shown with a sign.
///
/// # Examples
///
/// ```
/// use bess_sim::reporting::format_currency;
///
/// assert_eq!(format_currency(1234567.891), "$1,234,567.89");
/// assert_eq!(format_currency(-42.0), "-$42.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
