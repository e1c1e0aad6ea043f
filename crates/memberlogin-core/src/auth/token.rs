use std::fmt;

/// Opaque proof of authentication issued by the server.
///
/// The client never inspects it; it is only handed to the session so later
/// requests can attach it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<{} bytes>)", self.0.len())
    }
}

impl PartialEq<str> for AuthToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AuthToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let token = AuthToken::new("tok_abc");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("tok_abc"));
        assert_eq!(debug, "AuthToken(<7 bytes>)");
    }
}
