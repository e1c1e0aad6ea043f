//! Local validation of the login form.
//!
//! Credentials are only checked for presence. Format and length are left to
//! the server so the client never rejects something the server would accept.

use std::collections::BTreeMap;
use std::fmt;

/// Message shown under an empty ID field
pub const IDENTIFIER_REQUIRED: &str = "Please enter your ID.";

/// Message shown under an empty password field
pub const SECRET_REQUIRED: &str = "Please enter your password.";

/// The identifier/secret pair for one login attempt.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Form fields that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Identifier,
    Secret,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Identifier => "identifier",
            Field::Secret => "secret",
        }
    }
}

/// Per-field error messages. Only invalid fields have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Remove the error for one field, leaving the others alone
    pub fn clear(&mut self, field: Field) {
        self.entries.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Check that both fields of the form are filled in.
pub fn validate(credentials: &Credentials) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if credentials.identifier.is_empty() {
        errors.insert(Field::Identifier, IDENTIFIER_REQUIRED);
    }
    if credentials.secret.is_empty() {
        errors.insert(Field::Secret, SECRET_REQUIRED);
    }

    errors
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_both_empty() {
        let errors = validate(&Credentials::new("", ""));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Identifier), Some(IDENTIFIER_REQUIRED));
        assert_eq!(errors.get(Field::Secret), Some(SECRET_REQUIRED));
    }

    #[test]
    fn test_validate_single_empty_field() {
        let errors = validate(&Credentials::new("alice", ""));
        assert!(!errors.contains(Field::Identifier));
        assert!(errors.contains(Field::Secret));

        let errors = validate(&Credentials::new("", "hunter2"));
        assert!(errors.contains(Field::Identifier));
        assert!(!errors.contains(Field::Secret));
    }

    #[test]
    fn test_validate_presence_only() {
        // Whitespace and single characters count as present
        assert!(validate(&Credentials::new(" ", "x")).is_empty());
        assert!(validate(&Credentials::new("alice", "correct123")).is_empty());
    }

    #[test]
    fn test_validate_is_deterministic() {
        let creds = Credentials::new("", "secret");
        assert_eq!(validate(&creds), validate(&creds));
    }

    #[test]
    fn test_clear_single_field() {
        let mut errors = validate(&Credentials::default());
        errors.clear(Field::Identifier);
        assert!(!errors.contains(Field::Identifier));
        assert_eq!(errors.get(Field::Secret), Some(SECRET_REQUIRED));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", Credentials::new("alice", "correct123"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("correct123"));
    }
}
