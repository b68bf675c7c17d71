//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Generate a numeric one-time code of the given length
pub fn generate_otp_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    // One '@', a non-empty local part and a dotted domain.
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && email.len() > 5
        && !email.contains(char::is_whitespace)
}

/// Validate mobile number format (basic validation)
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && mobile.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

/// Validate a hex color value like `#22c55e`
pub fn is_valid_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        format!("{}...", &text[..max_length.saturating_sub(3)])
    }
}

/// Calculate pagination offset
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_code() {
        let code = generate_otp_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let other = generate_otp_code(4);
        assert_eq!(other.len(), 4);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("dev@csrippers.com"));
        assert!(is_valid_email("first.last@example.co.in"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@missing-local.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("spaced user@example.com"));
    }

    #[test]
    fn test_is_valid_mobile() {
        assert!(is_valid_mobile("+91 98765 43210"));
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("abc-def-ghij"));
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("#22c55e"));
        assert!(is_valid_hex_color("#fff"));
        assert!(!is_valid_hex_color("22c55e"));
        assert!(!is_valid_hex_color("#22c55"));
        assert!(!is_valid_hex_color("#gggggg"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Dev@CSRippers.COM "), "dev@csrippers.com");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
    }

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 20), 0);
        assert_eq!(calculate_offset(3, 20), 40);
        assert_eq!(calculate_offset(0, 20), 0);
    }
}
