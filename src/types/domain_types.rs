// src/types/domain_types.rs
//! Domain newtypes validated at the configuration boundary.

use super::ValidationError;
use std::fmt;

/// Integration secret for the Notion API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the secret, not even in debug logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..7).unwrap_or("");
        write!(f, "{}…", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_key_generations() {
        assert!(ApiKey::new("secret_abcdefghijklmnopqrstu").is_ok());
        assert!(ApiKey::new("ntn_abcdefghijklmnopqrstuvw").is_ok());
    }

    #[test]
    fn rejects_foreign_or_short_keys() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("sk-abcdefghijklmnopqrstuvwxyz").is_err());
        assert!(ApiKey::new("ntn_short").is_err());
    }

    #[test]
    fn display_redacts_the_secret() {
        let key = ApiKey::new("secret_abcdefghijklmnopqrstu").unwrap();
        assert_eq!(key.to_string(), "secret_…");
        assert!(!format!("{:?}", key).contains("abcdef"));
    }
}
