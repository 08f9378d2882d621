//! Restriction levels and the policy check.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who may use a restricted element.
///
/// Attached to each element as configuration; never derived.
///
/// # Truth Table
///
/// | level | system admin | scope admin | allowed |
/// |-------|--------------|-------------|---------|
/// | `Everyone` | any | any | yes |
/// | `AdminOnly` | yes | any | yes |
/// | `AdminOnly` | no | yes | yes |
/// | `AdminOnly` | no | no | no |
/// | `SystemAdminOnly` | yes | any | yes |
/// | `SystemAdminOnly` | no | any | no |
///
/// # Serialization
///
/// Uses the configuration names `EVERYONE`, `ADMIN` and `SYSTEM_ADMIN`.
///
/// # Example
///
/// ```
/// use warden_auth::RestrictionLevel;
///
/// assert!(RestrictionLevel::Everyone.permits(false, false));
/// assert!(RestrictionLevel::AdminOnly.permits(true, false));
/// assert!(!RestrictionLevel::AdminOnly.permits(false, false));
/// assert!(!RestrictionLevel::SystemAdminOnly.permits(true, false));
///
/// let level: RestrictionLevel = "system_admin".parse().unwrap();
/// assert_eq!(level, RestrictionLevel::SystemAdminOnly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RestrictionLevel {
    /// No restriction.
    #[serde(rename = "EVERYONE")]
    Everyone,

    /// Must be an admin of the element's scope, or a system admin.
    #[default]
    #[serde(rename = "ADMIN")]
    AdminOnly,

    /// Must be a system admin. Scope admin rights are not enough.
    #[serde(rename = "SYSTEM_ADMIN")]
    SystemAdminOnly,
}

impl RestrictionLevel {
    /// Returns `true` if a caller with the given rights passes this level.
    #[must_use]
    pub fn permits(self, is_scope_admin: bool, is_system_admin: bool) -> bool {
        match self {
            Self::Everyone => true,
            Self::AdminOnly => is_system_admin || is_scope_admin,
            Self::SystemAdminOnly => is_system_admin,
        }
    }

    /// Returns `true` if this level lets anyone through.
    #[must_use]
    pub fn is_unrestricted(self) -> bool {
        matches!(self, Self::Everyone)
    }

    /// Returns the configuration name ("EVERYONE", "ADMIN", "SYSTEM_ADMIN").
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Everyone => "EVERYONE",
            Self::AdminOnly => "ADMIN",
            Self::SystemAdminOnly => "SYSTEM_ADMIN",
        }
    }
}

/// Combines a restriction level with the caller's admin flags.
///
/// Free-function form of [`RestrictionLevel::permits`]. Pure; performs no
/// lookups.
#[must_use]
pub fn is_allowed(level: RestrictionLevel, is_scope_admin: bool, is_system_admin: bool) -> bool {
    level.permits(is_scope_admin, is_system_admin)
}

impl std::fmt::Display for RestrictionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown restriction level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown restriction level '{0}' (expected EVERYONE, ADMIN or SYSTEM_ADMIN)")]
pub struct ParseLevelError(String);

impl FromStr for RestrictionLevel {
    type Err = ParseLevelError;

    /// Parses a level case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EVERYONE" => Ok(Self::Everyone),
            "ADMIN" => Ok(Self::AdminOnly),
            "SYSTEM_ADMIN" => Ok(Self::SystemAdminOnly),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

    #[test]
    fn everyone_always_allowed() {
        for (scope_admin, system_admin) in FLAGS {
            assert!(is_allowed(RestrictionLevel::Everyone, scope_admin, system_admin));
        }
    }

    #[test]
    fn admin_only_is_or_of_flags() {
        for (scope_admin, system_admin) in FLAGS {
            assert_eq!(
                is_allowed(RestrictionLevel::AdminOnly, scope_admin, system_admin),
                scope_admin || system_admin,
                "scope_admin={scope_admin} system_admin={system_admin}"
            );
        }
    }

    #[test]
    fn system_admin_only_ignores_scope_admin() {
        for (scope_admin, system_admin) in FLAGS {
            assert_eq!(
                is_allowed(RestrictionLevel::SystemAdminOnly, scope_admin, system_admin),
                system_admin
            );
        }
    }

    #[test]
    fn default_is_admin_only() {
        assert_eq!(RestrictionLevel::default(), RestrictionLevel::AdminOnly);
        assert!(!RestrictionLevel::default().is_unrestricted());
        assert!(RestrictionLevel::Everyone.is_unrestricted());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("everyone".parse(), Ok(RestrictionLevel::Everyone));
        assert_eq!(" Admin ".parse(), Ok(RestrictionLevel::AdminOnly));
        assert_eq!("SYSTEM_ADMIN".parse(), Ok(RestrictionLevel::SystemAdminOnly));
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "root".parse::<RestrictionLevel>().expect_err("unknown level");
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn serde_uses_config_names() {
        let json = serde_json::to_string(&RestrictionLevel::SystemAdminOnly).expect("serialize");
        assert_eq!(json, "\"SYSTEM_ADMIN\"");

        let level: RestrictionLevel = serde_json::from_str("\"ADMIN\"").expect("deserialize");
        assert_eq!(level, RestrictionLevel::AdminOnly);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(RestrictionLevel::Everyone.to_string(), "EVERYONE");
    }
}
