//! Resolved scope entities.
//!
//! A [`ScopeRef`](crate::ScopeRef) is what configuration *says*; a
//! [`ProjectRef`] or [`RepoRef`] is what the scope directory found. The
//! distinction matters: configuration may name a project that has since
//! been deleted, and only a resolved entity can be handed to a
//! permission check.

use crate::{ProjectId, ProjectKey, RepositoryId, RepositorySlug};
use serde::{Deserialize, Serialize};

/// A project that exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Entity identifier.
    pub id: ProjectId,
    /// Project key.
    pub key: ProjectKey,
}

impl ProjectRef {
    /// Creates a project reference with a fresh id.
    #[must_use]
    pub fn new(key: ProjectKey) -> Self {
        Self {
            id: ProjectId::new(),
            key,
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.key, self.id.uuid())
    }
}

/// A repository that exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Entity identifier.
    pub id: RepositoryId,
    /// Owning project.
    pub project: ProjectRef,
    /// Repository slug.
    pub slug: RepositorySlug,
}

impl RepoRef {
    /// Creates a repository reference with a fresh id.
    #[must_use]
    pub fn new(project: ProjectRef, slug: RepositorySlug) -> Self {
        Self {
            id: RepositoryId::new(),
            project,
            slug,
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.project.key, self.slug, self.id.uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_display_includes_project_key() {
        let project = ProjectRef::new(ProjectKey::parse("ACME").expect("key"));
        let repo = RepoRef::new(project, RepositorySlug::parse("repo1").expect("slug"));
        assert!(repo.to_string().starts_with("ACME/repo1#"));
    }

    #[test]
    fn refs_with_same_key_are_distinct_entities() {
        let key = ProjectKey::parse("ACME").expect("key");
        assert_ne!(ProjectRef::new(key.clone()), ProjectRef::new(key));
    }
}
