//! Mock identity handling. Nothing is verified and no passwords are kept; a
//! user only exists so finished sessions can be attributed on the leaderboard.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Clone)]
pub struct MockAuth {
    current: Option<User>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in with any non-empty credentials. The display name is the part
    /// of the email before `@`.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        Ok(self.sign_in(User {
            name,
            email: email.to_string(),
        }))
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<&User> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(self.sign_in(User {
            name: name.to_string(),
            email: email.to_string(),
        }))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::debug!(name = %user.name, "user logged out");
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    fn sign_in(&mut self, user: User) -> &User {
        tracing::debug!(name = %user.name, "user signed in");
        self.current.insert(user)
    }
}

/// `local@domain.tld` shape check: one `@`, no whitespace, and a dot inside
/// the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_login_uses_email_prefix() {
        let mut auth = MockAuth::new();
        let user = auth.login("ada@example.com", "secret").unwrap();
        assert_eq!(user.name, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(auth.current_user().is_some());
    }

    #[test]
    fn test_login_without_at_sign() {
        let mut auth = MockAuth::new();
        let user = auth.login("grace", "pw").unwrap();
        assert_eq!(user.name, "grace");
    }

    #[test]
    fn test_login_requires_credentials() {
        let mut auth = MockAuth::new();
        assert_matches!(auth.login("", "pw"), Err(Error::MissingCredentials));
        assert_matches!(auth.login("a@b.c", ""), Err(Error::MissingCredentials));
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_register_uses_given_name() {
        let mut auth = MockAuth::new();
        let user = auth.register("Linus", "lt@kernel.org", "pw").unwrap();
        assert_eq!(user.name, "Linus");
        assert_matches!(
            auth.register("", "x@y.z", "pw"),
            Err(Error::MissingCredentials)
        );
        assert_eq!(auth.current_user().unwrap().name, "Linus");
    }

    #[test]
    fn test_logout_clears_user() {
        let mut auth = MockAuth::new();
        auth.login("a@b.c", "pw").unwrap();
        auth.logout();
        assert!(auth.current_user().is_none());
        auth.logout();
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("userexample.com"));
    }
}
