//! Scope types for admin checks.

use crate::{ProjectKey, RepositorySlug};
use serde::{Deserialize, Serialize};

/// The entity against which admin rights are evaluated.
///
/// # Scope Hierarchy
///
/// ```text
/// Global
///   └── Project(key)
///         └── Repository(key, slug)
/// ```
///
/// # Admin Requirements
///
/// | Scope | Scope admin means |
/// |-------|-------------------|
/// | `Global` | never (only system admins pass) |
/// | `Project` | project-admin permission on the resolved project |
/// | `Repository` | repository-admin permission on the resolved repository |
///
/// A repository-scoped check is never widened to its project: holding
/// project admin does not, by itself, satisfy `Repository`.
///
/// # Example
///
/// ```
/// use warden_types::ScopeRef;
///
/// assert!(ScopeRef::from_parts(None, None).is_global());
/// assert!(ScopeRef::from_parts(Some(""), Some("repo1")).is_global());
///
/// let project = ScopeRef::from_parts(Some("ACME"), Some(""));
/// assert_eq!(project.to_string(), "scope:project:ACME");
///
/// let repo = ScopeRef::from_parts(Some("ACME"), Some("repo1"));
/// assert_eq!(repo.to_string(), "scope:repo:ACME/repo1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeRef {
    /// No scope.
    #[default]
    Global,

    /// A project, identified by key.
    Project {
        /// Project key.
        key: ProjectKey,
    },

    /// A repository, identified by its project key and slug.
    Repository {
        /// Key of the owning project.
        project: ProjectKey,
        /// Repository slug.
        slug: RepositorySlug,
    },
}

impl ScopeRef {
    /// Creates a project scope.
    #[must_use]
    pub fn project(key: ProjectKey) -> Self {
        Self::Project { key }
    }

    /// Creates a repository scope.
    #[must_use]
    pub fn repository(project: ProjectKey, slug: RepositorySlug) -> Self {
        Self::Repository { project, slug }
    }

    /// Builds a scope from raw, possibly empty configuration strings.
    ///
    /// | project key | slug | result |
    /// |-------------|------|--------|
    /// | present | present | `Repository` |
    /// | present | absent | `Project` |
    /// | absent | any | `Global` |
    ///
    /// Empty strings count as absent; any other value, whitespace included,
    /// is kept verbatim. A slug without a project key cannot
    /// name a repository, so it yields `Global`.
    #[must_use]
    pub fn from_parts(project_key: Option<&str>, slug: Option<&str>) -> Self {
        let key = project_key.and_then(ProjectKey::parse);
        let slug = slug.and_then(RepositorySlug::parse);
        match (key, slug) {
            (Some(project), Some(slug)) => Self::Repository { project, slug },
            (Some(key), None) => Self::Project { key },
            (None, _) => Self::Global,
        }
    }

    /// Returns `true` if this is the global scope.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Returns the project key, if any.
    ///
    /// For `Repository`, this is the owning project's key.
    #[must_use]
    pub fn project_key(&self) -> Option<&ProjectKey> {
        match self {
            Self::Global => None,
            Self::Project { key } => Some(key),
            Self::Repository { project, .. } => Some(project),
        }
    }

    /// Returns the repository slug if this is a repository scope.
    #[must_use]
    pub fn repository_slug(&self) -> Option<&RepositorySlug> {
        match self {
            Self::Repository { slug, .. } => Some(slug),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "scope:global"),
            Self::Project { key } => write!(f, "scope:project:{key}"),
            Self::Repository { project, slug } => write!(f, "scope:repo:{project}/{slug}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ProjectKey {
        ProjectKey::parse(s).expect("valid project key")
    }

    fn slug(s: &str) -> RepositorySlug {
        RepositorySlug::parse(s).expect("valid slug")
    }

    #[test]
    fn from_parts_precedence() {
        assert_eq!(
            ScopeRef::from_parts(Some("ACME"), Some("repo1")),
            ScopeRef::repository(key("ACME"), slug("repo1"))
        );
        assert_eq!(
            ScopeRef::from_parts(Some("ACME"), None),
            ScopeRef::project(key("ACME"))
        );
        assert_eq!(ScopeRef::from_parts(None, None), ScopeRef::Global);
    }

    #[test]
    fn from_parts_empty_strings_are_absent() {
        assert_eq!(
            ScopeRef::from_parts(Some("ACME"), Some("")),
            ScopeRef::project(key("ACME"))
        );
        assert_eq!(ScopeRef::from_parts(Some(""), Some("")), ScopeRef::Global);
    }

    #[test]
    fn whitespace_parts_are_not_absent() {
        assert_eq!(
            ScopeRef::from_parts(Some("   "), Some("  ")),
            ScopeRef::repository(key("   "), slug("  "))
        );
        assert_eq!(
            ScopeRef::from_parts(Some(" ACME "), None),
            ScopeRef::project(key(" ACME "))
        );
    }

    #[test]
    fn slug_without_project_is_global() {
        assert_eq!(ScopeRef::from_parts(None, Some("repo1")), ScopeRef::Global);
        assert_eq!(ScopeRef::from_parts(Some(""), Some("repo1")), ScopeRef::Global);
    }

    #[test]
    fn accessors() {
        let repo = ScopeRef::repository(key("ACME"), slug("repo1"));
        assert_eq!(repo.project_key(), Some(&key("ACME")));
        assert_eq!(repo.repository_slug(), Some(&slug("repo1")));
        assert!(!repo.is_global());

        let project = ScopeRef::project(key("ACME"));
        assert_eq!(project.project_key(), Some(&key("ACME")));
        assert!(project.repository_slug().is_none());

        assert!(ScopeRef::Global.project_key().is_none());
        assert!(ScopeRef::default().is_global());
    }

    #[test]
    fn serde_tagged() {
        let repo = ScopeRef::repository(key("ACME"), slug("repo1"));
        let json = serde_json::to_value(&repo).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"kind": "repository", "project": "ACME", "slug": "repo1"})
        );

        let global: ScopeRef = serde_json::from_str(r#"{"kind":"global"}"#).expect("deserialize");
        assert!(global.is_global());
    }
}
