//! Password strength rule.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Minimum number of characters in a password.
const MIN_LEN: usize = 7;

/// Unicode general categories P* and S*.
fn is_punct_or_symbol(c: char) -> bool {
    use GeneralCategory::*;

    matches!(
        get_general_category(c),
        ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

/// Accepts passwords of at least seven characters containing an uppercase
/// letter, a lowercase letter, a digit, and a punctuation or symbol character.
///
/// Characters are scanned once and the scan stops as soon as every class
/// has been seen past the minimum length. There is no maximum length.
pub fn validate_password(value: &str) -> bool {
    let (mut upper, mut lower, mut digit, mut special) = (false, false, false, false);

    for (i, c) in value.chars().enumerate() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_numeric() {
            digit = true;
        } else if is_punct_or_symbol(c) {
            special = true;
        }

        if i + 1 >= MIN_LEN && upper && lower && digit && special {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password() {
        assert!(validate_password("Abcdef1!"));
        assert!(validate_password("Zz9#xxx"));
    }

    #[test]
    fn test_short_passwords_fail() {
        for pw in ["", "A", "Ab1!", "Abc1!x"] {
            assert!(!validate_password(pw), "{pw:?} should fail");
        }
    }

    #[test]
    fn test_each_class_required() {
        let full = "Abcdef1!";
        assert!(validate_password(full));

        // Drop one class at a time, keeping the length.
        assert!(!validate_password("abcdef1!"), "no uppercase");
        assert!(!validate_password("ABCDEF1!"), "no lowercase");
        assert!(!validate_password("Abcdefg!"), "no digit");
        assert!(!validate_password("Abcdef12"), "no symbol");
    }

    #[test]
    fn test_classes_seen_before_min_length() {
        // All classes appear in the first four characters.
        assert!(validate_password("A1!aaaa"));
        assert!(!validate_password("A1!aaa"));
    }

    #[test]
    fn test_unicode_symbols_and_letters() {
        assert!(validate_password("Ñandú9€"));
        assert!(validate_password("Paßwort1+"));
        assert!(validate_password("Abcdef1^"));
        assert!(validate_password("Abcdef1«"));
    }

    #[test]
    fn test_marks_and_spaces_are_not_symbols() {
        assert!(!validate_password("Abcdef1\u{0301}"));
        assert!(!validate_password("Abcdef1 "));
        assert!(!validate_password("Abcdef1\u{200D}"));
    }

    #[test]
    fn test_no_maximum_length() {
        let long = format!("Aa1!{}", "x".repeat(10_000));
        assert!(validate_password(&long));
    }
}
