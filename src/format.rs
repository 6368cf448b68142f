//! US-dollar display formatting
//!
//! Summary figures (cumulative totals, annual amounts) are shown in whole
//! dollars, per-month figures with cents. Rounding is half away from zero.
//! Amounts are formatted from their decimal text, so values of any magnitude
//! keep all their digits. NaN displays as zero and infinities as `$∞`.

/// Format as whole dollars, e.g. `$211,537`
pub fn money0(amount: f64) -> String {
    money(amount, 0)
}

/// Format with cents, e.g. `$1,712.28`
pub fn money2(amount: f64) -> String {
    money(amount, 2)
}

/// Format a plain quantity with a fixed number of decimals (e.g. `19.6` kW)
pub fn fixed(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.*}", decimals, round_half_away(value, decimals))
}

/// Format a fraction as a whole percentage, e.g. `0.9` -> `90%`
pub fn percent(fraction: f64) -> String {
    let fraction = if fraction.is_finite() { fraction } else { 0.0 };
    format!("{}%", (fraction * 100.0).round() as i64)
}

fn money(amount: f64, decimals: usize) -> String {
    let amount = if amount.is_nan() { 0.0 } else { amount };
    let sign = if amount < 0.0 { "-" } else { "" };
    if amount.is_infinite() {
        return format!("{}$∞", sign);
    }

    let digits = format!("{:.*}", decimals, round_half_away(amount.abs(), decimals));
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let is_zero = digits.bytes().all(|b| b == b'0' || b == b'.');

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if !is_zero {
        out.push_str(sign);
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if decimals > 0 {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Round to `decimals` places, ties away from zero
///
/// Past 2^53 units the value has no sub-unit precision left, so it is
/// returned as is.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    scaled.round() / scale
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
