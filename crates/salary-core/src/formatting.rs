use crate::models::ParsedRange;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use salary_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.*}", decimals as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // A value that rounds to zero keeps no sign.
    if value < 0.0 && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a salary amount as USD with cents.
///
/// ```
/// use salary_core::formatting::format_currency;
///
/// assert_eq!(format_currency(128532.0), "$128,532.00");
/// assert_eq!(format_currency(37.5), "$37.50");
/// assert_eq!(format_currency(-9.99), "-$9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Short salary label in the style job boards use.
///
/// ```
/// use salary_core::formatting::format_compact;
///
/// assert_eq!(format_compact(130000.0), "$130K");
/// assert_eq!(format_compact(62400.0), "$62.4K");
/// assert_eq!(format_compact(1250000.0), "$1.25M");
/// assert_eq!(format_compact(37.5), "$37.50");
/// ```
pub fn format_compact(amount: f64) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}${}M", trim_zeros(&format!("{:.2}", abs / 1_000_000.0)))
    } else if abs >= 1_000.0 {
        format!("{sign}${}K", trim_zeros(&format!("{:.1}", abs / 1_000.0)))
    } else {
        format!("{sign}${abs:.2}")
    }
}

/// `"$62,400.00 – $78,000.00"`, or a single amount when both bounds agree.
pub fn format_range(range: &ParsedRange) -> String {
    if range.is_single() {
        format_currency(range.min())
    } else {
        format!(
            "{} – {}",
            format_currency(range.min()),
            format_currency(range.max())
        )
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
