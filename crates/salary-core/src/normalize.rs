//! Salary text normalisation.
//!
//! Turns scraped salary strings into a canonical lowercase form in which
//! numbers carry no currency markers or thousands separators and all
//! whitespace is a single ASCII space.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static CURRENCY_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"us\$|\busd\b|\$").expect("regex is valid"));

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("regex is valid"));

/// Normalised salary text. Only produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text with parenthetical asides such as `"(estimated)"` blanked out.
    ///
    /// Numbers inside parentheses are commentary ("401(k)", "(2 positions)")
    /// rather than pay figures.
    pub fn without_asides(&self) -> Cow<'_, str> {
        PARENTHETICAL.replace_all(&self.0, " ")
    }
}

/// Normalise raw salary text. Never fails; junk input yields junk (or empty)
/// output and is rejected later by the extractor.
///
/// ```
/// use salary_core::normalize::normalize;
///
/// assert_eq!(normalize("US$6,211–15,211/Month").as_str(), "6211–15211/month");
/// assert_eq!(normalize("  $65K -\u{a0}$90K  a year ").as_str(), "65k - 90k a year");
/// ```
pub fn normalize(raw: &str) -> NormalizedText {
    let lowered = raw.to_ascii_lowercase();
    let stripped = CURRENCY_MARKERS.replace_all(&lowered, "");

    let chars: Vec<char> = stripped.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            ',' => {
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if !(digit_before && digit_after) {
                    out.push(' ');
                }
            }
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }

    NormalizedText(out.split_whitespace().collect::<Vec<_>>().join(" "))
}
