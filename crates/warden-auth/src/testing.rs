//! In-memory collaborators for tests and examples.
//!
//! Each double counts its calls so tests can assert on side effects
//! ("no lookup happened", "exactly one diagnostic") rather than only on
//! results. Failures can be injected with `fail_with`.
//!
//! ```
//! use warden_auth::testing::InMemoryDirectory;
//! use warden_auth::ScopeDirectory;
//! use warden_types::ProjectKey;
//!
//! let directory = InMemoryDirectory::new();
//! directory.add_project("ACME");
//!
//! let key = ProjectKey::parse("ACME").unwrap();
//! assert!(directory.project(&key).unwrap().is_some());
//! assert_eq!(directory.lookup_count(), 1);
//! ```

use crate::{
    CollaboratorError, DiagnosticSink, IdentityProvider, PermissionOracle, RestrictionLevel,
    ScopeDiagnostic, ScopeDirectory, SettingsSource, ThreadTrust,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use warden_types::{
    Identity, ProjectId, ProjectKey, ProjectRef, RepoRef, RepositoryId, RepositorySlug, UserKey,
};

/// Identity provider returning a fixed, swappable user.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user: RwLock<Option<Identity>>,
}

impl StaticIdentity {
    /// Creates a provider for `user`.
    #[must_use]
    pub fn new(user: Option<Identity>) -> Self {
        Self {
            user: RwLock::new(user),
        }
    }

    /// No authenticated user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// `user` is signed in.
    #[must_use]
    pub fn signed_in(user: Identity) -> Self {
        Self::new(Some(user))
    }

    /// Replaces the current user.
    pub fn set(&self, user: Option<Identity>) {
        *self.user.write() = user;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<Identity> {
        self.user.read().clone()
    }
}

/// Scope directory backed by hash maps.
///
/// Records how many lookups ran and how many of them ran under
/// [`ThreadTrust`] elevation.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    projects: RwLock<HashMap<ProjectKey, ProjectRef>>,
    repositories: RwLock<HashMap<(ProjectKey, RepositorySlug), RepoRef>>,
    failure: RwLock<Option<String>>,
    lookups: AtomicUsize,
    elevated_lookups: AtomicUsize,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or returns the existing) project.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn add_project(&self, key: &str) -> ProjectRef {
        let key = parse_project(key);
        self.projects
            .write()
            .entry(key.clone())
            .or_insert_with(|| ProjectRef::new(key))
            .clone()
    }

    /// Adds a repository, creating its project if needed.
    ///
    /// # Panics
    ///
    /// Panics if `project` or `slug` is empty.
    pub fn add_repository(&self, project: &str, slug: &str) -> RepoRef {
        let project = self.add_project(project);
        let slug = RepositorySlug::parse(slug).expect("repository slug must not be empty");
        self.repositories
            .write()
            .entry((project.key.clone(), slug.clone()))
            .or_insert_with(|| RepoRef::new(project, slug))
            .clone()
    }

    /// Removes a project and its repositories.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn remove_project(&self, key: &str) {
        let key = parse_project(key);
        self.projects.write().remove(&key);
        self.repositories.write().retain(|(project, _), _| *project != key);
    }

    /// Makes every subsequent lookup fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Number of lookups performed.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of lookups performed while the thread was elevated.
    #[must_use]
    pub fn elevated_lookup_count(&self) -> usize {
        self.elevated_lookups.load(Ordering::SeqCst)
    }

    fn record(&self, operation: &'static str) -> Result<(), CollaboratorError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if ThreadTrust::level().is_elevated() {
            self.elevated_lookups.fetch_add(1, Ordering::SeqCst);
        }
        match self.failure.read().as_deref() {
            Some(message) => Err(CollaboratorError::new(operation, message)),
            None => Ok(()),
        }
    }
}

impl ScopeDirectory for InMemoryDirectory {
    fn project(&self, key: &ProjectKey) -> Result<Option<ProjectRef>, CollaboratorError> {
        self.record("get project")?;
        Ok(self.projects.read().get(key).cloned())
    }

    fn repository(
        &self,
        project: &ProjectKey,
        slug: &RepositorySlug,
    ) -> Result<Option<RepoRef>, CollaboratorError> {
        self.record("get repository")?;
        Ok(self
            .repositories
            .read()
            .get(&(project.clone(), slug.clone()))
            .cloned())
    }
}

/// Permission oracle backed by explicit grants.
///
/// Grants are keyed by entity id, so a grant on a removed and re-created
/// project does not carry over.
#[derive(Debug, Default)]
pub struct GrantTable {
    project_admins: RwLock<HashSet<(UserKey, ProjectId)>>,
    repo_admins: RwLock<HashSet<(UserKey, RepositoryId)>>,
    failure: RwLock<Option<String>>,
    checks: AtomicUsize,
    elevated_checks: AtomicUsize,
}

impl GrantTable {
    /// Creates a table with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants project admin on `project` to `identity`.
    pub fn grant_project_admin(&self, identity: &Identity, project: &ProjectRef) {
        self.project_admins
            .write()
            .insert((identity.key().clone(), project.id));
    }

    /// Grants repository admin on `repo` to `identity`.
    pub fn grant_repo_admin(&self, identity: &Identity, repo: &RepoRef) {
        self.repo_admins
            .write()
            .insert((identity.key().clone(), repo.id));
    }

    /// Makes every subsequent check fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Number of permission checks performed.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    /// Number of permission checks performed while the thread was elevated.
    #[must_use]
    pub fn elevated_check_count(&self) -> usize {
        self.elevated_checks.load(Ordering::SeqCst)
    }

    fn record(&self, operation: &'static str) -> Result<(), CollaboratorError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if ThreadTrust::level().is_elevated() {
            self.elevated_checks.fetch_add(1, Ordering::SeqCst);
        }
        match self.failure.read().as_deref() {
            Some(message) => Err(CollaboratorError::new(operation, message)),
            None => Ok(()),
        }
    }
}

impl PermissionOracle for GrantTable {
    fn has_project_admin(
        &self,
        identity: &Identity,
        project: &ProjectRef,
    ) -> Result<bool, CollaboratorError> {
        self.record("check project admin")?;
        Ok(self
            .project_admins
            .read()
            .contains(&(identity.key().clone(), project.id)))
    }

    fn has_repo_admin(
        &self,
        identity: &Identity,
        repo: &RepoRef,
    ) -> Result<bool, CollaboratorError> {
        self.record("check repository admin")?;
        Ok(self
            .repo_admins
            .read()
            .contains(&(identity.key().clone(), repo.id)))
    }
}

/// Settings source that can be switched between a level and a failure.
#[derive(Debug)]
pub struct FixedSettings {
    level: RwLock<Result<RestrictionLevel, String>>,
}

impl FixedSettings {
    /// Creates settings returning `level`.
    #[must_use]
    pub fn new(level: RestrictionLevel) -> Self {
        Self {
            level: RwLock::new(Ok(level)),
        }
    }

    /// Replaces the level.
    pub fn set(&self, level: RestrictionLevel) {
        *self.level.write() = Ok(level);
    }

    /// Makes every subsequent read fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.level.write() = Err(message.into());
    }
}

impl SettingsSource for FixedSettings {
    fn admin_restriction(&self) -> Result<RestrictionLevel, CollaboratorError> {
        self.level
            .read()
            .clone()
            .map_err(|message| CollaboratorError::new("read admin restriction", message))
    }
}

/// Diagnostic sink that keeps every report.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ScopeDiagnostic>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<ScopeDiagnostic> {
        self.records.lock().clone()
    }

    /// Number of diagnostics reported.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.lock().len()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &ScopeDiagnostic) {
        self.records.lock().push(diagnostic.clone());
    }
}

fn parse_project(key: &str) -> ProjectKey {
    ProjectKey::parse(key).expect("project key must not be empty")
}
