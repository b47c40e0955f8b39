//! Number formatting for rationale and driver strings

/// Ratio as a percentage with one decimal, e.g. `0.1` to `10.0%`
#[must_use]
pub fn percent1(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Ratio as a whole percentage, e.g. `0.6` to `60%`
#[must_use]
pub fn percent0(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Truncate to an integer and group thousands with commas
#[must_use]
pub fn thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Dollars as millions with the given precision, e.g. `$2.50M`
#[must_use]
pub fn millions(dollars: f64, precision: usize) -> String {
    format!("${:.precision$}M", dollars / 1_000_000.0)
}
