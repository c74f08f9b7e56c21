//! Alias code generation and validation utilities.
//!
//! Generated codes come from the OS RNG; requested codes are checked against
//! the allowed alphabet and the router's own path segments.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

pub const MIN_CUSTOM_CODE_LEN: usize = 1;
pub const MAX_CUSTOM_CODE_LEN: usize = 32;

/// Codes that collide with top-level route segments.
pub const RESERVED_CODES: &[&str] = &["links", "r", "stats", "health"];

/// Generates a random URL-safe alias code.
///
/// Nine bytes from `getrandom`, encoded as URL-safe base64 without padding,
/// giving a 12-character code.
///
/// # Errors
///
/// Returns the RNG error if the system entropy source is unavailable.
pub fn generate_code() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];
    getrandom::fill(&mut buffer)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a caller-requested alias code.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let len = code.chars().count();
    if !(MIN_CUSTOM_CODE_LEN..=MAX_CUSTOM_CODE_LEN).contains(&len) {
        return Err(AppError::bad_request(
            "Custom code must be 1-32 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code().unwrap();
        assert_eq!(code.len(), 12);
    }

    #[test]
    fn test_generate_code_passes_own_validation() {
        for _ in 0..100 {
            let code = generate_code().unwrap();
            assert!(validate_custom_code(&code).is_ok(), "{code}");
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code().unwrap()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_validate_length_bounds() {
        assert!(validate_custom_code("a").is_ok());
        assert!(validate_custom_code("abc").is_ok());
        assert!(validate_custom_code(&"a".repeat(32)).is_ok());

        let err = validate_custom_code("").unwrap_err();
        assert!(err.to_string().contains("1-32 characters"));
        assert!(validate_custom_code(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_mixed_case_and_separators() {
        assert!(validate_custom_code("Promo_2025-Spring").is_ok());
        assert!(validate_custom_code("-leading").is_ok());
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        for code in ["my code", "a/b/c/d", "promo@1", "caf√©s", "percent%20"] {
            let result = validate_custom_code(code);
            assert!(result.is_err(), "'{code}' should be rejected");
        }
    }

    #[test]
    fn test_validate_reserved_codes() {
        for &reserved in RESERVED_CODES {
            assert!(validate_custom_code(reserved).is_err(), "'{reserved}' should be rejected");
        }
        let err = validate_custom_code("links").unwrap_err();
        assert!(err.to_string().contains("reserved"));
        assert!(validate_custom_code("STATS").is_err());
        assert!(validate_custom_code("health").is_err());
        assert!(validate_custom_code("statsx").is_ok());
    }
}
