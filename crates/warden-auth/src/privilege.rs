//! Elevated-trust context for scope lookups.
//!
//! Scope lookups answer "does this project/repository exist", not "can
//! the caller see it", so they run with elevated trust. Elevation is
//! sudo-like and as narrow as possible:
//!
//! ```text
//! ElevationGuard::acquire ──► TrustBroker::escalate
//!         │
//!         ├── directory lookup (the only call made while elevated)
//!         │
//!   Drop  └──────────────────► TrustBroker::restore
//! ```
//!
//! [`ElevationGuard`] restores on drop, so trust is released on every exit
//! path: normal return, `?` early return, or a panic unwinding through the
//! lookup. Subsequent, unrelated work on the same thread never inherits the
//! elevated context.

use crate::{AuthzError, CollaboratorError};
use std::cell::Cell;

/// The current privilege level of an execution context.
///
/// # Example
///
/// ```
/// use warden_auth::PrivilegeLevel;
///
/// assert!(!PrivilegeLevel::default().is_elevated());
/// assert!(PrivilegeLevel::Elevated { depth: 1 }.is_elevated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivilegeLevel {
    /// Caller's own permissions only.
    #[default]
    Standard,

    /// Running with elevated trust.
    Elevated {
        /// Number of nested guards currently held.
        depth: usize,
    },
}

impl PrivilegeLevel {
    /// Returns `true` if currently elevated.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Elevated { .. })
    }
}

/// Switches the execution context into and out of elevated trust.
///
/// Implement this over the embedding platform's security service. Every
/// successful [`escalate`](Self::escalate) is paired with exactly one
/// [`restore`](Self::restore) by [`ElevationGuard`].
pub trait TrustBroker: Send + Sync {
    /// Enters elevated trust.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the platform refuses the switch.
    fn escalate(&self, reason: &'static str) -> Result<(), CollaboratorError>;

    /// Leaves elevated trust, undoing one `escalate`.
    fn restore(&self);
}

/// Broker for directories that need no context switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrust;

impl TrustBroker for NoopTrust {
    fn escalate(&self, _reason: &'static str) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn restore(&self) {}
}

thread_local! {
    static ELEVATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Thread-local, re-entrant trust broker.
///
/// Elevation is tracked per thread, so concurrent evaluations on other
/// threads are unaffected. Directories running in-process can consult
/// [`ThreadTrust::level`] to decide whether to bypass visibility filters.
///
/// # Example
///
/// ```
/// use warden_auth::{ElevationGuard, ThreadTrust};
///
/// let trust = ThreadTrust;
/// assert!(!ThreadTrust::level().is_elevated());
///
/// {
///     let _guard = ElevationGuard::acquire(&trust, "getting project").unwrap();
///     assert!(ThreadTrust::level().is_elevated());
/// }
///
/// assert!(!ThreadTrust::level().is_elevated());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTrust;

impl ThreadTrust {
    /// Returns the current thread's privilege level.
    #[must_use]
    pub fn level() -> PrivilegeLevel {
        match ELEVATION_DEPTH.with(Cell::get) {
            0 => PrivilegeLevel::Standard,
            depth => PrivilegeLevel::Elevated { depth },
        }
    }
}

impl TrustBroker for ThreadTrust {
    fn escalate(&self, _reason: &'static str) -> Result<(), CollaboratorError> {
        ELEVATION_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Ok(())
    }

    fn restore(&self) {
        ELEVATION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Holds elevated trust until dropped.
#[must_use = "trust is restored as soon as the guard is dropped"]
pub struct ElevationGuard<'a> {
    broker: &'a dyn TrustBroker,
    reason: &'static str,
}

impl<'a> ElevationGuard<'a> {
    /// Escalates through `broker`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Escalation`] if the broker refuses. Nothing is
    /// restored in that case, since nothing was acquired.
    pub fn acquire(broker: &'a dyn TrustBroker, reason: &'static str) -> Result<Self, AuthzError> {
        broker
            .escalate(reason)
            .map_err(|source| AuthzError::Escalation { reason, source })?;
        tracing::trace!(reason, "trust escalated");
        Ok(Self { broker, reason })
    }
}

impl Drop for ElevationGuard<'_> {
    fn drop(&mut self) {
        self.broker.restore();
        tracing::trace!(reason = self.reason, "trust restored");
    }
}

impl std::fmt::Debug for ElevationGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationGuard")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Runs `op` with elevated trust, restoring afterwards.
///
/// # Errors
///
/// Returns [`AuthzError::Escalation`] if trust cannot be acquired; `op` is
/// not run in that case.
pub fn with_elevation<T>(
    broker: &dyn TrustBroker,
    reason: &'static str,
    op: impl FnOnce() -> T,
) -> Result<T, AuthzError> {
    let _guard = ElevationGuard::acquire(broker, reason)?;
    Ok(op())
}
