//! The authorization resolver.
//!
//! [`AccessResolver`] combines three procedures:
//!
//! ```text
//! filter_allowed(elements)                 Element Filter
//!     └── is_allowed_use(element)          per element
//!           ├── IdentityProvider           no identity → deny
//!           ├── is_admin(identity, scope)  Scope Admin Check
//!           │     ├── system admin → true (no lookup)
//!           │     ├── ScopeDirectory       under ElevationGuard
//!           │     └── PermissionOracle
//!           └── RestrictionLevel::permits  Policy Check
//! ```
//!
//! # Every Check Requires an Identity
//!
//! Anonymous callers are denied on every path, including elements
//! restricted to `Everyone`. `Everyone` lifts the admin requirement, not
//! the authentication requirement. Changing this would alter what
//! anonymous users can do, so it is kept as policy.
//!
//! # Failure Handling
//!
//! | Condition | Result |
//! |-----------|--------|
//! | No identity | `Ok(false)` |
//! | Scope does not exist | `Ok(false)` + one [`ScopeDiagnostic`] |
//! | Collaborator fails | `Err(AuthzError)` for that evaluation |
//!
//! [`filter_allowed`](AccessResolver::filter_allowed) isolates collaborator
//! failures to the failing element (logged, element excluded).
//! [`try_filter_allowed`](AccessResolver::try_filter_allowed) surfaces them
//! instead, for callers that cannot accept partial results.
//!
//! # Concurrency
//!
//! The resolver holds no mutable state and caches nothing between calls.
//! Share it across threads behind an `Arc`.

use crate::{
    with_elevation, AuthzError, DiagnosticSink, IdentityProvider, NoopTrust, PermissionOracle,
    Restricted, RestrictionLevel, ScopeDiagnostic, ScopeDirectory, SettingsSource, TracingSink,
    TrustBroker,
};
use std::sync::Arc;
use tracing::{debug, error, warn};
use warden_types::{ErrorCode, Identity, ScopeRef};

/// Decides whether the current caller may use restricted elements.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_auth::testing::{GrantTable, InMemoryDirectory, StaticIdentity};
/// use warden_auth::{AccessResolver, PolicyElement, RestrictionLevel};
/// use warden_types::{Identity, ScopeRef};
///
/// let directory = Arc::new(InMemoryDirectory::new());
/// let acme = directory.add_project("ACME");
/// let grants = Arc::new(GrantTable::new());
/// grants.grant_project_admin(&Identity::user("alice"), &acme);
///
/// let resolver = AccessResolver::new(
///     Arc::new(StaticIdentity::signed_in(Identity::user("alice"))),
///     directory,
///     grants,
///     Arc::new(RestrictionLevel::AdminOnly),
/// );
///
/// let buttons = vec![
///     PolicyElement::new("Rebuild", RestrictionLevel::Everyone),
///     PolicyElement::new("Purge", RestrictionLevel::SystemAdminOnly),
///     PolicyElement::new("Merge", RestrictionLevel::AdminOnly)
///         .with_scope(ScopeRef::from_parts(Some("ACME"), None)),
/// ];
///
/// let allowed: Vec<_> = resolver.filter_allowed(&buttons).map(|b| b.name()).collect();
/// assert_eq!(allowed, ["Rebuild", "Merge"]);
/// ```
pub struct AccessResolver {
    identity: Arc<dyn IdentityProvider>,
    directory: Arc<dyn ScopeDirectory>,
    permissions: Arc<dyn PermissionOracle>,
    settings: Arc<dyn SettingsSource>,
    trust: Arc<dyn TrustBroker>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl AccessResolver {
    /// Creates a resolver over the given collaborators.
    ///
    /// Defaults to [`NoopTrust`] for lookups and [`TracingSink`] for
    /// diagnostics; override with [`with_trust`](Self::with_trust) and
    /// [`with_diagnostics`](Self::with_diagnostics).
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn ScopeDirectory>,
        permissions: Arc<dyn PermissionOracle>,
        settings: Arc<dyn SettingsSource>,
    ) -> Self {
        Self {
            identity,
            directory,
            permissions,
            settings,
            trust: Arc::new(NoopTrust),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Sets the broker used to elevate trust around scope lookups.
    #[must_use]
    pub fn with_trust(mut self, trust: Arc<dyn TrustBroker>) -> Self {
        self.trust = trust;
        self
    }

    /// Sets the sink receiving dangling-scope diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns `true` if `identity` is a system administrator.
    #[must_use]
    pub fn is_system_admin(&self, identity: &Identity) -> bool {
        identity.is_system_admin()
    }

    /// Scope Admin Check: does `identity` hold admin rights at `scope`?
    ///
    /// | scope | result |
    /// |-------|--------|
    /// | any, caller is system admin | `true`, no lookup |
    /// | `Global` | `false` |
    /// | `Project` | project admin on the resolved project |
    /// | `Repository` | repository admin on the resolved repository |
    ///
    /// A scope that does not resolve yields `false` and one diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError`] if trust escalation, the lookup, or the
    /// permission check fails.
    pub fn is_admin(&self, identity: &Identity, scope: &ScopeRef) -> Result<bool, AuthzError> {
        if self.is_system_admin(identity) {
            return Ok(true);
        }

        match scope {
            ScopeRef::Global => Ok(false),

            ScopeRef::Project { key } => {
                let project = with_elevation(self.trust.as_ref(), "getting project", || {
                    self.directory.project(key)
                })?
                .map_err(|source| AuthzError::ScopeLookup {
                    scope: scope.clone(),
                    source,
                })?;

                let Some(project) = project else {
                    self.diagnostics
                        .report(&ScopeDiagnostic::MissingProject { key: key.clone() });
                    return Ok(false);
                };

                self.permissions
                    .has_project_admin(identity, &project)
                    .map_err(|source| AuthzError::PermissionCheck {
                        principal: identity.key().clone(),
                        scope: scope.clone(),
                        source,
                    })
            }

            ScopeRef::Repository { project, slug } => {
                let repo = with_elevation(self.trust.as_ref(), "getting repo", || {
                    self.directory.repository(project, slug)
                })?
                .map_err(|source| AuthzError::ScopeLookup {
                    scope: scope.clone(),
                    source,
                })?;

                let Some(repo) = repo else {
                    self.diagnostics.report(&ScopeDiagnostic::MissingRepository {
                        project: project.clone(),
                        slug: slug.clone(),
                    });
                    return Ok(false);
                };

                self.permissions
                    .has_repo_admin(identity, &repo)
                    .map_err(|source| AuthzError::PermissionCheck {
                        principal: identity.key().clone(),
                        scope: scope.clone(),
                        source,
                    })
            }
        }
    }

    /// May the current caller use `element`?
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError`] if a collaborator fails.
    pub fn is_allowed_use<E: Restricted + ?Sized>(&self, element: &E) -> Result<bool, AuthzError> {
        let Some(identity) = self.identity.current_user() else {
            debug!(scope = %element.scope(), "use denied: no authenticated user");
            return Ok(false);
        };

        self.decide(&identity, element.restriction(), element.scope())
    }

    /// May the current caller reach the admin pages for `scope`?
    ///
    /// Gated by the global admin restriction setting, read once per call.
    /// Pass [`ScopeRef::Global`] for the global settings page.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError`] if settings or a collaborator fail.
    pub fn is_admin_allowed(&self, scope: &ScopeRef) -> Result<bool, AuthzError> {
        let Some(identity) = self.identity.current_user() else {
            debug!(scope = %scope, "admin access denied: no authenticated user");
            return Ok(false);
        };

        let level = self
            .settings
            .admin_restriction()
            .map_err(AuthzError::Settings)?;

        let allowed = self.decide(&identity, level, scope)?;
        if !allowed {
            warn!(
                principal = %identity.key(),
                scope = %scope,
                level = %level,
                "admin access denied"
            );
        }

        Ok(allowed)
    }

    /// Read-only visibility gate: `true` iff a caller is authenticated.
    #[must_use]
    pub fn is_view_allowed(&self) -> bool {
        self.identity.current_user().is_some()
    }

    /// Element Filter: lazily yields the elements the current caller may use.
    ///
    /// Order is preserved. Each element is evaluated independently: a
    /// collaborator failure is logged and excludes only that element.
    /// Accepts owned elements or references (`&[PolicyElement]`,
    /// `Vec<Box<dyn Restricted>>`, ...).
    pub fn filter_allowed<'r, I>(&'r self, elements: I) -> impl Iterator<Item = I::Item> + 'r
    where
        I: IntoIterator,
        I::IntoIter: 'r,
        I::Item: Restricted,
    {
        elements
            .into_iter()
            .filter(move |element| match self.is_allowed_use(element) {
                Ok(allowed) => allowed,
                Err(err) => {
                    error!(
                        code = err.code(),
                        scope = %element.scope(),
                        error = %err,
                        "element denied after collaborator failure"
                    );
                    false
                }
            })
    }

    /// Like [`filter_allowed`](Self::filter_allowed), but yields collaborator
    /// failures as `Err` instead of excluding the element.
    ///
    /// Collect into `Result<Vec<_>, _>` to abort on the first failure.
    pub fn try_filter_allowed<'r, I>(
        &'r self,
        elements: I,
    ) -> impl Iterator<Item = Result<I::Item, AuthzError>> + 'r
    where
        I: IntoIterator,
        I::IntoIter: 'r,
        I::Item: Restricted,
    {
        elements
            .into_iter()
            .filter_map(move |element| match self.is_allowed_use(&element) {
                Ok(true) => Some(Ok(element)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
    }

    /// Policy Check for an authenticated caller.
    fn decide(
        &self,
        identity: &Identity,
        level: RestrictionLevel,
        scope: &ScopeRef,
    ) -> Result<bool, AuthzError> {
        let system_admin = self.is_system_admin(identity);
        let scope_admin = self.is_admin(identity, scope)?;
        let allowed = level.permits(scope_admin, system_admin);

        // Audit logging
        if allowed {
            debug!(
                principal = %identity.key(),
                scope = %scope,
                level = %level,
                scope_admin,
                system_admin,
                "use allowed"
            );
        } else {
            debug!(
                principal = %identity.key(),
                scope = %scope,
                level = %level,
                scope_admin,
                "use denied: insufficient rights"
            );
        }

        Ok(allowed)
    }
}

impl std::fmt::Debug for AccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GrantTable, InMemoryDirectory, RecordingSink, StaticIdentity};
    use crate::{PolicyElement, ThreadTrust};

    struct Fixture {
        identity: Arc<StaticIdentity>,
        directory: Arc<InMemoryDirectory>,
        grants: Arc<GrantTable>,
        sink: Arc<RecordingSink>,
        resolver: AccessResolver,
    }

    fn fixture(user: Option<Identity>) -> Fixture {
        let identity = Arc::new(StaticIdentity::new(user));
        let directory = Arc::new(InMemoryDirectory::new());
        let grants = Arc::new(GrantTable::new());
        let sink = Arc::new(RecordingSink::new());
        let resolver = AccessResolver::new(
            identity.clone(),
            directory.clone(),
            grants.clone(),
            Arc::new(RestrictionLevel::AdminOnly),
        )
        .with_trust(Arc::new(ThreadTrust))
        .with_diagnostics(sink.clone());

        Fixture {
            identity,
            directory,
            grants,
            sink,
            resolver,
        }
    }

    fn scope(project: &str, slug: Option<&str>) -> ScopeRef {
        ScopeRef::from_parts(Some(project), slug)
    }

    #[test]
    fn system_admin_skips_lookup() {
        let f = fixture(None);
        let root = Identity::system_admin("root");

        assert!(f.resolver.is_admin(&root, &scope("MISSING", None)).expect("check"));
        assert!(f.resolver.is_admin(&root, &scope("MISSING", Some("r"))).expect("check"));
        assert_eq!(f.directory.lookup_count(), 0);
        assert_eq!(f.grants.check_count(), 0);
        assert_eq!(f.sink.count(), 0);
    }

    #[test]
    fn global_scope_is_never_scope_admin() {
        let f = fixture(None);
        assert!(!f
            .resolver
            .is_admin(&Identity::user("alice"), &ScopeRef::Global)
            .expect("check"));
        assert_eq!(f.directory.lookup_count(), 0);
    }

    #[test]
    fn missing_project_denies_with_one_diagnostic() {
        let f = fixture(None);
        let alice = Identity::user("alice");

        assert!(!f.resolver.is_admin(&alice, &scope("ACME", None)).expect("check"));
        assert_eq!(f.sink.count(), 1);
        assert_eq!(f.sink.records()[0].code(), "CONFIG_MISSING_PROJECT");
        assert_eq!(f.grants.check_count(), 0);
    }

    #[test]
    fn padded_project_key_is_not_normalized() {
        let f = fixture(None);
        let acme = f.directory.add_project("ACME");
        let alice = Identity::user("alice");
        f.grants.grant_project_admin(&alice, &acme);

        assert!(!f.resolver.is_admin(&alice, &scope(" ACME ", None)).expect("check"));
        assert_eq!(f.sink.count(), 1);
        assert_eq!(f.sink.records()[0].code(), "CONFIG_MISSING_PROJECT");

        assert!(!f.resolver.is_admin(&alice, &scope("   ", None)).expect("check"));
        assert_eq!(f.sink.count(), 2);
        assert_eq!(f.directory.lookup_count(), 2);
        assert_eq!(f.grants.check_count(), 0);
    }

    #[test]
    fn missing_repository_denies_with_one_diagnostic() {
        let f = fixture(None);
        f.directory.add_project("ACME");
        let alice = Identity::user("alice");

        assert!(!f
            .resolver
            .is_admin(&alice, &scope("ACME", Some("repo1")))
            .expect("check"));
        assert_eq!(f.sink.count(), 1);
        assert_eq!(f.sink.records()[0].code(), "CONFIG_MISSING_REPOSITORY");
    }

    #[test]
    fn project_admin_is_scope_admin() {
        let f = fixture(None);
        let acme = f.directory.add_project("ACME");
        let alice = Identity::user("alice");
        f.grants.grant_project_admin(&alice, &acme);

        assert!(f.resolver.is_admin(&alice, &scope("ACME", None)).expect("check"));
        assert!(!f
            .resolver
            .is_admin(&Identity::user("bob"), &scope("ACME", None))
            .expect("check"));
    }

    #[test]
    fn repository_scope_is_not_widened_to_project() {
        let f = fixture(None);
        let repo = f.directory.add_repository("ACME", "repo1");
        let alice = Identity::user("alice");
        f.grants.grant_project_admin(&alice, &repo.project);

        assert!(!f
            .resolver
            .is_admin(&alice, &scope("ACME", Some("repo1")))
            .expect("check"));

        f.grants.grant_repo_admin(&alice, &repo);
        assert!(f
            .resolver
            .is_admin(&alice, &scope("ACME", Some("repo1")))
            .expect("check"));
    }

    #[test]
    fn lookups_run_elevated_and_restore() {
        let f = fixture(None);
        f.directory.add_repository("ACME", "repo1");
        let alice = Identity::user("alice");

        f.resolver.is_admin(&alice, &scope("ACME", None)).expect("check");
        f.resolver
            .is_admin(&alice, &scope("ACME", Some("repo1")))
            .expect("check");

        assert_eq!(f.directory.lookup_count(), 2);
        assert_eq!(f.directory.elevated_lookup_count(), 2);
        assert!(!ThreadTrust::level().is_elevated());
        assert_eq!(f.grants.elevated_check_count(), 0);
    }

    #[test]
    fn lookup_failure_propagates() {
        let f = fixture(None);
        f.directory.fail_with("directory offline");

        let err = f
            .resolver
            .is_admin(&Identity::user("alice"), &scope("ACME", None))
            .expect_err("lookup failure");

        assert_eq!(err.code(), "AUTHZ_SCOPE_LOOKUP");
        assert_eq!(f.sink.count(), 0);
        assert!(!ThreadTrust::level().is_elevated());
    }

    #[test]
    fn permission_failure_propagates() {
        let f = fixture(None);
        f.directory.add_project("ACME");
        f.grants.fail_with("oracle offline");

        let err = f
            .resolver
            .is_admin(&Identity::user("alice"), &scope("ACME", None))
            .expect_err("permission failure");

        assert!(matches!(err, AuthzError::PermissionCheck { .. }));
    }

    #[test]
    fn anonymous_denied_even_for_everyone() {
        let f = fixture(None);
        let open = PolicyElement::new("Open", RestrictionLevel::Everyone);

        assert!(!f.resolver.is_allowed_use(&open).expect("check"));
        assert!(!f.resolver.is_view_allowed());
        assert_eq!(f.directory.lookup_count(), 0);
    }

    #[test]
    fn everyone_allows_any_authenticated_user() {
        let f = fixture(Some(Identity::user("alice")));
        let open = PolicyElement::new("Open", RestrictionLevel::Everyone);

        assert!(f.resolver.is_allowed_use(&open).expect("check"));
        assert!(f.resolver.is_view_allowed());
    }

    #[test]
    fn everyone_with_dangling_scope_still_reports() {
        let f = fixture(Some(Identity::user("alice")));
        let open = PolicyElement::new("Open", RestrictionLevel::Everyone)
            .with_scope(scope("GONE", None));

        assert!(f.resolver.is_allowed_use(&open).expect("check"));
        assert_eq!(f.sink.count(), 1);
    }

    #[test]
    fn system_admin_only_ignores_project_admin() {
        let f = fixture(Some(Identity::user("alice")));
        let acme = f.directory.add_project("ACME");
        f.grants.grant_project_admin(&Identity::user("alice"), &acme);
        let purge = PolicyElement::new("Purge", RestrictionLevel::SystemAdminOnly)
            .with_scope(scope("ACME", None));

        assert!(!f.resolver.is_allowed_use(&purge).expect("check"));

        f.identity.set(Some(Identity::system_admin("root")));
        assert!(f.resolver.is_allowed_use(&purge).expect("check"));
    }

    #[test]
    fn admin_allowed_reads_global_setting() {
        let f = fixture(Some(Identity::user("alice")));
        assert!(!f.resolver.is_admin_allowed(&ScopeRef::Global).expect("check"));

        let open = AccessResolver::new(
            f.identity.clone(),
            f.directory.clone(),
            f.grants.clone(),
            Arc::new(RestrictionLevel::Everyone),
        );
        assert!(open.is_admin_allowed(&ScopeRef::Global).expect("check"));
    }

    #[test]
    fn filter_isolates_failures() {
        let f = fixture(Some(Identity::user("alice")));
        f.directory.fail_with("directory offline");
        let elements = vec![
            PolicyElement::new("a", RestrictionLevel::Everyone),
            PolicyElement::new("b", RestrictionLevel::Everyone).with_scope(scope("ACME", None)),
            PolicyElement::new("c", RestrictionLevel::Everyone),
        ];

        let names: Vec<_> = f.resolver.filter_allowed(&elements).map(|e| e.name()).collect();
        assert_eq!(names, ["a", "c"]);

        let strict: Result<Vec<_>, _> = f.resolver.try_filter_allowed(&elements).collect();
        assert!(strict.is_err());
    }
}
