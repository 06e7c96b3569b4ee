//! Phone number rule.

/// Number of characters in an accepted phone number.
const PHONE_LEN: usize = 10;

/// Accepts exactly ten characters starting with `5`. The value is not
/// normalized first, so separators or a country code make it invalid.
pub fn validate_phone(value: &str) -> bool {
    value.chars().count() == PHONE_LEN && value.starts_with('5')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phone() {
        assert!(validate_phone("5123456789"));
    }

    #[test]
    fn test_wrong_prefix() {
        assert!(!validate_phone("4123456789"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(!validate_phone("512345678"));
        assert!(!validate_phone("51234567890"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn test_not_normalized() {
        assert!(!validate_phone("512-345-678"));
        assert!(!validate_phone(" 512345678"));
    }
}
