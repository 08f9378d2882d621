//! Requesting identity.
//!
//! An [`Identity`] is supplied per request by the embedding system's
//! identity provider. It is never persisted by warden.
//!
//! Identity carries only who is asking and whether that user is a
//! system administrator. Scope-level rights (project admin, repository
//! admin) are not attributes of the identity; they are looked up against
//! live entities at decision time.

use crate::UserKey;
use serde::{Deserialize, Serialize};

/// The user a decision is being made for.
///
/// # Example
///
/// ```
/// use warden_types::{Identity, UserKey};
///
/// let alice = Identity::user("alice");
/// assert!(!alice.is_system_admin());
///
/// let root = Identity::system_admin("root");
/// assert!(root.is_system_admin());
/// assert_eq!(root.key(), &UserKey::new("root"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    key: UserKey,
    system_admin: bool,
}

impl Identity {
    /// Creates an identity with an explicit system-admin flag.
    #[must_use]
    pub fn new(key: UserKey, system_admin: bool) -> Self {
        Self { key, system_admin }
    }

    /// Creates a regular (non system-admin) identity.
    #[must_use]
    pub fn user(key: impl Into<String>) -> Self {
        Self::new(UserKey::new(key), false)
    }

    /// Creates a system-admin identity.
    #[must_use]
    pub fn system_admin(key: impl Into<String>) -> Self {
        Self::new(UserKey::new(key), true)
    }

    /// Returns the stable user key.
    #[must_use]
    pub fn key(&self) -> &UserKey {
        &self.key
    }

    /// Returns `true` if this user is a system administrator.
    #[must_use]
    pub fn is_system_admin(&self) -> bool {
        self.system_admin
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.system_admin {
            write!(f, "{}@sysadmin", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_is_not_system_admin() {
        let id = Identity::user("alice");
        assert!(!id.is_system_admin());
        assert_eq!(id.key().as_str(), "alice");
    }

    #[test]
    fn display_marks_system_admin() {
        assert_eq!(Identity::user("alice").to_string(), "user:alice");
        assert_eq!(Identity::system_admin("root").to_string(), "user:root@sysadmin");
    }

    #[test]
    fn equality_includes_flag() {
        let a = Identity::new(UserKey::new("x"), false);
        let b = Identity::new(UserKey::new("x"), true);
        assert_ne!(a, b);
        assert_eq!(a, Identity::user("x"));
    }
}
