//! Policy-bearing elements.
//!
//! An element is anything whose use is governed by a [`RestrictionLevel`]
//! and an optional scope, typically a configurable action button.
//! Elements are created by configuration management and consumed
//! read-only here.
//!
//! Any type can take part in filtering by implementing [`Restricted`];
//! [`PolicyElement`] is the concrete, configuration-loaded form.

use crate::RestrictionLevel;
use serde::{Deserialize, Serialize};
use warden_types::ScopeRef;

/// A value carrying a restriction policy.
///
/// # Scope
///
/// [`scope`](Self::scope) returns [`ScopeRef::Global`] when the element
/// has no scope of its own. An element is never configured *for* the
/// global scope; `Global` here only means "no scope restriction beyond
/// the level".
///
/// # Example
///
/// ```
/// use warden_auth::{Restricted, RestrictionLevel};
/// use warden_types::ScopeRef;
///
/// struct MergeButton {
///     scope: ScopeRef,
/// }
///
/// impl Restricted for MergeButton {
///     fn restriction(&self) -> RestrictionLevel {
///         RestrictionLevel::AdminOnly
///     }
///
///     fn scope(&self) -> &ScopeRef {
///         &self.scope
///     }
/// }
///
/// let button = MergeButton { scope: ScopeRef::from_parts(Some("ACME"), None) };
/// assert!(!button.restriction().is_unrestricted());
/// ```
pub trait Restricted {
    /// The configured restriction level.
    fn restriction(&self) -> RestrictionLevel;

    /// The configured scope, or `Global` if none.
    fn scope(&self) -> &ScopeRef;
}

impl<T: Restricted + ?Sized> Restricted for &T {
    fn restriction(&self) -> RestrictionLevel {
        (**self).restriction()
    }

    fn scope(&self) -> &ScopeRef {
        (**self).scope()
    }
}

impl<T: Restricted + ?Sized> Restricted for Box<T> {
    fn restriction(&self) -> RestrictionLevel {
        (**self).restriction()
    }

    fn scope(&self) -> &ScopeRef {
        (**self).scope()
    }
}

/// A named element with a restriction level and optional scope.
///
/// # Configuration Form
///
/// Deserializes from flat, string-typed fields. Empty strings count as
/// absent, and a slug without a project key is ignored:
///
/// ```toml
/// [[buttons]]
/// name = "Trigger build"
/// restriction = "ADMIN"
/// project_key = "ACME"
/// repository_slug = "repo1"
/// ```
///
/// # Example
///
/// ```
/// use warden_auth::{PolicyElement, Restricted, RestrictionLevel};
/// use warden_types::ScopeRef;
///
/// let button = PolicyElement::new("Trigger build", RestrictionLevel::AdminOnly)
///     .with_scope(ScopeRef::from_parts(Some("ACME"), Some("repo1")));
///
/// assert_eq!(button.name(), "Trigger build");
/// assert_eq!(button.scope().to_string(), "scope:repo:ACME/repo1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPolicyElement", into = "RawPolicyElement")]
pub struct PolicyElement {
    name: String,
    level: RestrictionLevel,
    scope: ScopeRef,
}

impl PolicyElement {
    /// Creates an unscoped element.
    #[must_use]
    pub fn new(name: impl Into<String>, level: RestrictionLevel) -> Self {
        Self {
            name: name.into(),
            level,
            scope: ScopeRef::Global,
        }
    }

    /// Returns this element restricted to `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeRef) -> Self {
        self.scope = scope;
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured restriction level.
    #[must_use]
    pub fn level(&self) -> RestrictionLevel {
        self.level
    }
}

impl Restricted for PolicyElement {
    fn restriction(&self) -> RestrictionLevel {
        self.level
    }

    fn scope(&self) -> &ScopeRef {
        &self.scope
    }
}

impl std::fmt::Display for PolicyElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} @ {}]", self.name, self.level, self.scope)
    }
}

#[derive(Serialize, Deserialize)]
struct RawPolicyElement {
    name: String,
    #[serde(default)]
    restriction: RestrictionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repository_slug: Option<String>,
}

impl From<RawPolicyElement> for PolicyElement {
    fn from(raw: RawPolicyElement) -> Self {
        let scope = ScopeRef::from_parts(raw.project_key.as_deref(), raw.repository_slug.as_deref());
        Self {
            name: raw.name,
            level: raw.restriction,
            scope,
        }
    }
}

impl From<PolicyElement> for RawPolicyElement {
    fn from(element: PolicyElement) -> Self {
        Self {
            project_key: element.scope.project_key().map(ToString::to_string),
            repository_slug: element.scope.repository_slug().map(ToString::to_string),
            name: element.name,
            restriction: element.level,
        }
    }
}
