//! Reusable input filters
//!
//! These run on form fields before validation.

/// Filter: trim whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: trim and convert to lowercase
pub fn lowercase(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Filter: drop spaces, dashes and parentheses typed inside a phone number
pub fn phone_digits(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '\u{a0}'))
        .collect()
}

/// Filter: round number to specified decimal places
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
