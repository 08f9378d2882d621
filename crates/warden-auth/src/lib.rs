//! Scope-aware authorization for restricted actions.
//!
//! Decides whether the current caller may use an action element (a
//! "button") restricted to a trust level, optionally narrowed to one
//! project or repository.
//!
//! # Layered Trust
//!
//! ```text
//! system admin  ⊇  scope admin (project / repository)  ⊇  authenticated user
//! ```
//!
//! | [`RestrictionLevel`] | Who may use the element |
//! |----------------------|-------------------------|
//! | `Everyone` | any authenticated user |
//! | `AdminOnly` | scope admins and system admins |
//! | `SystemAdminOnly` | system admins only |
//!
//! # Crate Architecture
//!
//! ```text
//! warden-types  (Identity, ScopeRef, ProjectRef, RepoRef)
//!      ↑
//! warden-auth  ◄── THIS CRATE
//!   ├── RestrictionLevel, is_allowed        pure decision table
//!   ├── Restricted, PolicyElement           what is being checked
//!   ├── AccessResolver                      scope admin check + filter
//!   ├── IdentityProvider, ScopeDirectory,   collaborators supplied by
//!   │   PermissionOracle, SettingsSource    the embedding system
//!   ├── TrustBroker, ElevationGuard         scoped elevated trust
//!   └── ScopeDiagnostic, DiagnosticSink     dangling-reference reports
//!      ↑
//! warden-runtime  (TOML config, ConfiguredSettings)
//! ```
//!
//! # Design Principles
//!
//! - **Deny is not an error**: missing users and dangling scopes yield
//!   `Ok(false)`; only collaborator faults yield [`AuthzError`]
//! - **Traits here, implementations in the embedder**: [`testing`] ships
//!   in-memory doubles
//! - **Elevation is scoped**: trust is raised only around a scope lookup
//!   and always restored

pub mod collaborator;
pub mod diagnostic;
pub mod element;
pub mod error;
pub mod level;
pub mod privilege;
pub mod resolver;
pub mod testing;

pub use collaborator::{IdentityProvider, PermissionOracle, ScopeDirectory, SettingsSource};
pub use diagnostic::{DiagnosticSink, ScopeDiagnostic, TracingSink};
pub use element::{PolicyElement, Restricted};
pub use error::{AuthzError, BoxError, CollaboratorError};
pub use level::{is_allowed, ParseLevelError, RestrictionLevel};
pub use privilege::{with_elevation, ElevationGuard, NoopTrust, PrivilegeLevel, ThreadTrust, TrustBroker};
pub use resolver::AccessResolver;

// Re-export core types from warden_types for convenience
pub use warden_types::{Identity, ProjectRef, RepoRef, ScopeRef};
