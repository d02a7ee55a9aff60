use reqwest::header::HeaderValue;

use crate::error::{ProbeError, Result};

/// API key sent in the `x-api-key` header on behalf of one tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Accept a key only if it is non-empty and fits in a header value.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` otherwise; the key itself is never part
    /// of the message.
    pub fn new(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(ProbeError::Config("API key is empty".to_string()));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(ProbeError::Config(
                "API key contains characters not allowed in a header".to_string(),
            ));
        }

        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_new_keeps_value() {
        let token = Token::new("7f3c2a9d1e8b4c6a").unwrap();

        assert_eq!(token.as_str(), "7f3c2a9d1e8b4c6a");
    }

    #[test]
    fn test_token_new_rejects_blank() {
        for value in ["", "   ", "\t"] {
            let err = Token::new(value).unwrap_err();
            assert!(matches!(err, ProbeError::Config(_)), "accepted {value:?}");
        }
    }

    #[test]
    fn test_token_new_rejects_header_breaking_characters() {
        let err = Token::new("secret\r\nx-injected: 1").unwrap_err();

        assert!(matches!(err, ProbeError::Config(_)));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_token_debug_redacts_value() {
        let token = Token::new("webapi_very_secret_key").unwrap();

        let debug_output = format!("{token:?}");

        assert_eq!(debug_output, "Token(<redacted>)");
        assert!(!debug_output.contains("secret"));
    }

    #[test]
    fn test_token_debug_in_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credential {
            tenant: String,
            token: Token,
        }

        let credential = Credential {
            tenant: String::from("TENANT1"),
            token: Token::new("super_secret_token").unwrap(),
        };

        let debug_output = format!("{credential:?}");

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("super_secret_token"));
        assert!(debug_output.contains("TENANT1"));
    }

    #[test]
    fn test_tokens_compare_by_value() {
        assert_eq!(Token::new("key").unwrap(), Token::new("key").unwrap());
        assert_ne!(Token::new("key1").unwrap(), Token::new("key2").unwrap());
    }
}
