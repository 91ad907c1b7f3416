//! Trusted-origin check for inbound bridge messages.

use std::collections::BTreeSet;

use super::error::BridgeError;

/// Origins a bridge endpoint accepts messages from.
///
/// An origin is trusted when it equals the endpoint's own origin or one of
/// the configured origins, compared as exact strings (scheme, host and port,
/// no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    self_origin: String,
    trusted: BTreeSet<String>,
}

impl OriginPolicy {
    pub fn new<I, T>(self_origin: impl Into<String>, trusted: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            self_origin: self_origin.into(),
            trusted: trusted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn self_origin(&self) -> &str {
        &self.self_origin
    }

    pub fn trusted(&self) -> impl Iterator<Item = &str> {
        self.trusted.iter().map(String::as_str)
    }

    pub fn is_trusted(&self, origin: &str) -> bool {
        if origin.is_empty() {
            return false;
        }
        origin == self.self_origin || self.trusted.contains(origin)
    }

    pub fn check(&self, origin: &str) -> Result<(), BridgeError> {
        if self.is_trusted(origin) {
            Ok(())
        } else {
            Err(BridgeError::UntrustedOrigin(origin.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OriginPolicy {
        OriginPolicy::new(
            "https://invites.example.com",
            ["https://cdn.example.com", "http://localhost:5173"],
        )
    }

    #[test]
    fn test_self_origin_trusted() {
        assert!(policy().is_trusted("https://invites.example.com"));
    }

    #[test]
    fn test_allow_listed_origins_trusted() {
        assert!(policy().is_trusted("https://cdn.example.com"));
        assert!(policy().is_trusted("http://localhost:5173"));
    }

    #[test]
    fn test_match_is_exact() {
        let policy = policy();
        assert!(!policy.is_trusted("https://invites.example.com/"));
        assert!(!policy.is_trusted("http://invites.example.com"));
        assert!(!policy.is_trusted("https://invites.example.com:8443"));
        assert!(!policy.is_trusted("https://evil.invites.example.com"));
        assert!(!policy.is_trusted("HTTPS://INVITES.EXAMPLE.COM"));
        assert!(!policy.is_trusted("http://localhost:5174"));
    }

    #[test]
    fn test_empty_origin_never_trusted() {
        let policy = OriginPolicy::new("", Vec::<String>::new());
        assert!(!policy.is_trusted(""));
    }

    #[test]
    fn test_check_reports_origin() {
        assert_eq!(
            policy().check("https://evil.example"),
            Err(BridgeError::UntrustedOrigin("https://evil.example".to_string()))
        );
        assert!(policy().check("https://cdn.example.com").is_ok());
    }
}
