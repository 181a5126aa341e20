//! Input validation utilities for the signup surface

/// Validates username format
/// Requirements:
/// - Length between 3 and 32 characters
/// - Only alphanumeric, underscore, and hyphen allowed
/// - Must start with alphanumeric character
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 32 {
        return false;
    }

    let first_char_valid = username
        .chars()
        .next()
        .map(|c| c.is_alphanumeric())
        .unwrap_or(false);

    if !first_char_valid {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("alice"));
        assert!(validate_username("user_01"));
        assert!(validate_username("acct-usd-7"));
    }

    #[test]
    fn test_validate_username_too_short() {
        assert!(!validate_username("ab"));
    }

    #[test]
    fn test_validate_username_too_long() {
        assert!(!validate_username(&"a".repeat(33)));
    }

    #[test]
    fn test_validate_username_bad_start() {
        assert!(!validate_username("_alice"));
        assert!(!validate_username("-alice"));
    }

    #[test]
    fn test_validate_username_bad_chars() {
        assert!(!validate_username("al ice"));
        assert!(!validate_username("alice!"));
    }
}
