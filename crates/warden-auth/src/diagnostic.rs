//! Configuration-reference diagnostics.
//!
//! When a policy element names a project or repository that does not
//! exist, the check is denied and a [`ScopeDiagnostic`] is reported.
//! This keeps misconfiguration visible instead of hiding it behind a
//! silent denial.

use warden_types::{ProjectKey, RepositorySlug, ScopeRef};

/// A policy references a scope that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeDiagnostic {
    /// The configured project does not exist.
    MissingProject {
        /// Configured project key.
        key: ProjectKey,
    },

    /// The configured repository does not exist.
    MissingRepository {
        /// Configured project key.
        project: ProjectKey,
        /// Configured repository slug.
        slug: RepositorySlug,
    },
}

impl ScopeDiagnostic {
    /// Machine-readable code for log filtering.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingProject { .. } => "CONFIG_MISSING_PROJECT",
            Self::MissingRepository { .. } => "CONFIG_MISSING_REPOSITORY",
        }
    }

    /// The dangling scope.
    #[must_use]
    pub fn scope(&self) -> ScopeRef {
        match self {
            Self::MissingProject { key } => ScopeRef::project(key.clone()),
            Self::MissingRepository { project, slug } => {
                ScopeRef::repository(project.clone(), slug.clone())
            }
        }
    }
}

impl std::fmt::Display for ScopeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProject { key } => {
                write!(f, "policy configured with project {key}, but no such project exists")
            }
            Self::MissingRepository { project, slug } => write!(
                f,
                "policy configured with project {project} and repository {slug}, but no such repository exists"
            ),
        }
    }
}

/// Receives scope diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn report(&self, diagnostic: &ScopeDiagnostic);
}

/// Default sink: one `tracing` error event per diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &ScopeDiagnostic) {
        match diagnostic {
            ScopeDiagnostic::MissingProject { key } => {
                tracing::error!(code = diagnostic.code(), project = %key, "{diagnostic}");
            }
            ScopeDiagnostic::MissingRepository { project, slug } => {
                tracing::error!(
                    code = diagnostic.code(),
                    project = %project,
                    slug = %slug,
                    "{diagnostic}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> ProjectKey {
        ProjectKey::parse("ACME").expect("key")
    }

    #[test]
    fn missing_project() {
        let diag = ScopeDiagnostic::MissingProject { key: acme() };

        assert_eq!(diag.code(), "CONFIG_MISSING_PROJECT");
        assert_eq!(diag.scope(), ScopeRef::project(acme()));
        assert!(diag.to_string().contains("project ACME"));
    }

    #[test]
    fn missing_repository() {
        let slug = RepositorySlug::parse("repo1").expect("slug");
        let diag = ScopeDiagnostic::MissingRepository {
            project: acme(),
            slug: slug.clone(),
        };

        assert_eq!(diag.code(), "CONFIG_MISSING_REPOSITORY");
        assert_eq!(diag.scope(), ScopeRef::repository(acme(), slug));
        assert!(diag.to_string().contains("repository repo1"));
    }
}
