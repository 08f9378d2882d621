//! External collaborator traits.
//!
//! The resolver makes decisions; these traits supply the facts it
//! decides on. All are synchronous, `Send + Sync`, and treated as
//! side-effect-free reads.
//!
//! # Architecture
//!
//! ```text
//! IdentityProvider  ── who is asking?
//! ScopeDirectory    ── does the scope exist?   (called under elevated trust)
//! PermissionOracle  ── is X admin of scope Y?
//! SettingsSource    ── global admin restriction level
//!        │
//!        └──► AccessResolver (warden-auth)
//! ```
//!
//! Implementations live in the embedding system. `warden-runtime` provides
//! a config-backed [`SettingsSource`]; [`crate::testing`] provides
//! in-memory doubles for all four.

use crate::{CollaboratorError, RestrictionLevel};
use warden_types::{Identity, ProjectKey, ProjectRef, RepoRef, RepositorySlug};

/// Resolves the identity behind the current request.
pub trait IdentityProvider: Send + Sync {
    /// Returns the current user, or `None` for anonymous callers.
    fn current_user(&self) -> Option<Identity>;
}

/// Resolves scope references to live entities.
///
/// Called under elevated trust: the answer must not depend on whether the
/// current caller can see the entity.
pub trait ScopeDirectory: Send + Sync {
    /// Looks up a project by key.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the lookup itself fails. A project
    /// that does not exist is `Ok(None)`, not an error.
    fn project(&self, key: &ProjectKey) -> Result<Option<ProjectRef>, CollaboratorError>;

    /// Looks up a repository by project key and slug.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the lookup itself fails.
    fn repository(
        &self,
        project: &ProjectKey,
        slug: &RepositorySlug,
    ) -> Result<Option<RepoRef>, CollaboratorError>;
}

/// Answers scope-level admin permission questions.
pub trait PermissionOracle: Send + Sync {
    /// Does `identity` hold project-admin permission on `project`?
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if evaluation fails.
    fn has_project_admin(
        &self,
        identity: &Identity,
        project: &ProjectRef,
    ) -> Result<bool, CollaboratorError>;

    /// Does `identity` hold repository-admin permission on `repo`?
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if evaluation fails.
    fn has_repo_admin(&self, identity: &Identity, repo: &RepoRef)
        -> Result<bool, CollaboratorError>;
}

/// Supplies the global admin restriction setting.
pub trait SettingsSource: Send + Sync {
    /// The restriction level gating the admin pages.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if settings cannot be read.
    fn admin_restriction(&self) -> Result<RestrictionLevel, CollaboratorError>;
}

/// A fixed admin restriction level.
impl SettingsSource for RestrictionLevel {
    fn admin_restriction(&self) -> Result<RestrictionLevel, CollaboratorError> {
        Ok(*self)
    }
}
