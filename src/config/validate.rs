//! Token validation.

use crate::common::error::SessionError;
use crate::config::types::PLACEHOLDER_TOKEN;

/// Check that a token is usable before connecting.
///
/// Absent and blank tokens are [`SessionError::MissingToken`]; the first-run
/// placeholder is [`SessionError::PlaceholderToken`].
pub fn validate_token(token: Option<&str>) -> Result<&str, SessionError> {
    let token = match token {
        Some(token) if !token.trim().is_empty() => token,
        _ => return Err(SessionError::MissingToken),
    };

    if token == PLACEHOLDER_TOKEN {
        return Err(SessionError::PlaceholderToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token_passes() {
        assert_eq!(validate_token(Some("abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_absent_token_fails() {
        assert!(matches!(validate_token(None), Err(SessionError::MissingToken)));
    }

    #[test]
    fn test_empty_token_fails() {
        assert!(matches!(validate_token(Some("")), Err(SessionError::MissingToken)));
        assert!(matches!(validate_token(Some("   ")), Err(SessionError::MissingToken)));
    }

    #[test]
    fn test_placeholder_token_fails() {
        let result = validate_token(Some("your_token_here"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }
}
