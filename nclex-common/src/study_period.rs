//! Study period parsing
//!
//! Reviews carry a free-text study period ("3 months", "1 year") plus a derived
//! month count used for filtering and statistics. The month count is computed
//! once, at submission time, by [`parse_months`].

/// Derive a month count from a free-text study period.
///
/// Takes the first contiguous run of ASCII digits anywhere in the string and
/// multiplies it by 12 when the text mentions "year" (case-insensitive).
/// Text without any digits yields 0. A decimal point ends the digit run, so
/// "1.5 years" counts as one year.
///
/// # Examples
///
/// ```
/// use nclex_common::parse_months;
///
/// assert_eq!(parse_months("3 months"), 3);
/// assert_eq!(parse_months("1 year"), 12);
/// assert_eq!(parse_months("1.5 years"), 12);
/// assert_eq!(parse_months("Year 2"), 24);
/// assert_eq!(parse_months(""), 0);
/// ```
pub fn parse_months(study_period: &str) -> u32 {
    let digits: String = study_period
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }

    // Saturate absurdly long digit runs instead of failing
    let n = digits.parse::<u32>().unwrap_or(u32::MAX);

    if study_period.to_lowercase().contains("year") {
        n.saturating_mul(12)
    } else {
        n
    }
}
