//! Authorization error types.
//!
//! ```text
//! Decision = IdentityProvider ─ ScopeDirectory ─ PermissionOracle ─ SettingsSource
//!                                      │                 │                 │
//!                                ScopeLookup      PermissionCheck       Settings
//!                                 (+ Escalation when the trust switch itself fails)
//! ```
//!
//! A denial is **not** an error. Missing identities and dangling scope
//! references both resolve to `Ok(false)`. [`AuthzError`] is reserved for
//! collaborators that fail outright, which may point at a deeper platform
//! problem and must not be mistaken for "scope not found".

use thiserror::Error;
use warden_types::{ErrorCode, ScopeRef, UserKey};

/// Boxed source error carried by [`CollaboratorError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A fault raised by an external collaborator.
///
/// # Example
///
/// ```
/// use warden_auth::CollaboratorError;
///
/// let err = CollaboratorError::new("project lookup", "connection reset");
/// assert_eq!(err.to_string(), "project lookup failed: connection reset");
/// ```
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct CollaboratorError {
    operation: &'static str,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl CollaboratorError {
    /// Creates a collaborator error with a message.
    #[must_use]
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a collaborator error wrapping an underlying error.
    #[must_use]
    pub fn with_source(operation: &'static str, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            operation,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// The collaborator operation that failed.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// Failure of a single authorization evaluation.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The scope directory failed while resolving a scope.
    #[error("scope lookup failed for {scope}: {source}")]
    ScopeLookup {
        /// Scope being resolved.
        scope: ScopeRef,
        /// Underlying failure.
        #[source]
        source: CollaboratorError,
    },

    /// The permission oracle failed while checking admin rights.
    #[error("permission check failed for {principal} on {scope}: {source}")]
    PermissionCheck {
        /// User being checked.
        principal: UserKey,
        /// Scope being checked.
        scope: ScopeRef,
        /// Underlying failure.
        #[source]
        source: CollaboratorError,
    },

    /// The admin restriction setting could not be read.
    #[error("failed to read admin restriction: {0}")]
    Settings(#[source] CollaboratorError),

    /// Elevated trust could not be acquired for a scope lookup.
    #[error("failed to escalate trust for '{reason}': {source}")]
    Escalation {
        /// Why escalation was requested.
        reason: &'static str,
        /// Underlying failure.
        #[source]
        source: CollaboratorError,
    },
}

impl ErrorCode for AuthzError {
    fn code(&self) -> &'static str {
        match self {
            Self::ScopeLookup { .. } => "AUTHZ_SCOPE_LOOKUP",
            Self::PermissionCheck { .. } => "AUTHZ_PERMISSION_CHECK",
            Self::Settings(_) => "AUTHZ_SETTINGS",
            Self::Escalation { .. } => "AUTHZ_ESCALATION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
