//! Tests for the events emitted through `tracing`.
//!
//! Captures formatted output from a scoped `tracing-subscriber` so the
//! default `TracingSink` and the filter's failure logging can be observed.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use warden_auth::testing::{GrantTable, InMemoryDirectory, StaticIdentity};
use warden_auth::{AccessResolver, Identity, PolicyElement, RestrictionLevel, ScopeRef};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a subscriber writing ERROR-and-above events into a buffer.
fn capture_errors(f: impl FnOnce()) -> Vec<String> {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::ERROR)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    captured.lines()
}

fn resolver(directory: Arc<InMemoryDirectory>, grants: Arc<GrantTable>) -> AccessResolver {
    AccessResolver::new(
        Arc::new(StaticIdentity::signed_in(Identity::user("alice"))),
        directory,
        grants,
        Arc::new(RestrictionLevel::AdminOnly),
    )
}

#[test]
fn missing_project_emits_one_error_event() {
    let resolver = resolver(Arc::new(InMemoryDirectory::new()), Arc::new(GrantTable::new()));
    let button = PolicyElement::new("Deploy", RestrictionLevel::AdminOnly)
        .with_scope(ScopeRef::from_parts(Some("GONE"), None));

    let lines = capture_errors(|| {
        assert!(!resolver.is_allowed_use(&button).expect("check"));
    });

    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("ERROR"));
    assert!(lines[0].contains("CONFIG_MISSING_PROJECT"));
    assert!(lines[0].contains("project GONE"));
}

#[test]
fn missing_repository_emits_project_and_slug() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.add_project("ACME");
    let resolver = resolver(directory, Arc::new(GrantTable::new()));
    let button = PolicyElement::new("Deploy", RestrictionLevel::AdminOnly)
        .with_scope(ScopeRef::from_parts(Some("ACME"), Some("repo1")));

    let lines = capture_errors(|| {
        assert!(!resolver.is_allowed_use(&button).expect("check"));
    });

    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("CONFIG_MISSING_REPOSITORY"));
    assert!(lines[0].contains("slug=repo1"));
}

#[test]
fn isolated_failure_is_logged_with_code() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.add_project("ACME");
    let grants = Arc::new(GrantTable::new());
    grants.fail_with("oracle offline");
    let resolver = resolver(directory, grants);
    let buttons = [PolicyElement::new("Merge", RestrictionLevel::AdminOnly)
        .with_scope(ScopeRef::from_parts(Some("ACME"), None))];

    let lines = capture_errors(|| {
        assert_eq!(resolver.filter_allowed(&buttons).count(), 0);
    });

    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("AUTHZ_PERMISSION_CHECK"));
    assert!(lines[0].contains("oracle offline"));
}

#[test]
fn granted_access_logs_no_errors() {
    let directory = Arc::new(InMemoryDirectory::new());
    let acme = directory.add_project("ACME");
    let grants = Arc::new(GrantTable::new());
    grants.grant_project_admin(&Identity::user("alice"), &acme);
    let resolver = resolver(directory, grants);
    let buttons = [PolicyElement::new("Merge", RestrictionLevel::AdminOnly)
        .with_scope(ScopeRef::from_parts(Some("ACME"), None))];

    let lines = capture_errors(|| {
        assert_eq!(resolver.filter_allowed(&buttons).count(), 1);
    });

    assert!(lines.is_empty(), "{lines:?}");
}
