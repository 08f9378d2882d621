//! Core types for warden.
//!
//! This crate provides the identity, scope, and entity reference types
//! shared by the authorization resolver and its embedding system.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  warden-types   : Identity, ScopeRef, keys, ErrorCode  ◄── HERE
//! ├──────────────────────────────────────────────────────────┤
//! │  warden-auth    : RestrictionLevel, AccessResolver,      │
//! │                   collaborator traits, diagnostics       │
//! ├──────────────────────────────────────────────────────────┤
//! │  warden-runtime : layered TOML config, settings source   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate makes a decision. It only names things:
//! *who* is asking ([`Identity`]), *where* ([`ScopeRef`]), and *what
//! exists* ([`ProjectRef`], [`RepoRef`]).
//!
//! # Example
//!
//! ```
//! use warden_types::{Identity, ScopeRef};
//!
//! let caller = Identity::user("alice");
//! let scope = ScopeRef::from_parts(Some("ACME"), Some("repo1"));
//!
//! assert!(!caller.is_system_admin());
//! assert_eq!(scope.repository_slug().map(|s| s.as_str()), Some("repo1"));
//! ```

mod entity;
mod error;
mod id;
mod identity;
mod scope;

pub use entity::{ProjectRef, RepoRef};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{EmptyKeyError, ProjectId, ProjectKey, RepositoryId, RepositorySlug, UserKey};
pub use identity::Identity;
pub use scope::ScopeRef;
