//! Tests for the SyncEngine

use ctx_core::{
    Error, RecordingReporter, ReportEvent, Scope, StoreState, SyncEngine, SyncOutcome,
    SyncSettings, TrackingStore,
};
use ctx_fs::{Digest, NormalizedPath};
use ctx_test_utils::SourceTree;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const TRACKING_FILE: &str = ".ctx-tool-tracking.json";

fn settings(verify_checksums: bool, backup_on_conflict: bool) -> SyncSettings {
    SyncSettings {
        allowed: vec!["configA".to_string(), "configB".to_string()],
        verify_checksums,
        backup_on_conflict,
    }
}

fn open_store(dest: &TempDir) -> TrackingStore {
    let mut store = TrackingStore::new(dest.path().join(TRACKING_FILE), Scope::Project, dest.path());
    store.load().unwrap();
    store
}

fn sync_file(
    source: &SourceTree,
    settings: &SyncSettings,
    store: &mut TrackingStore,
    relative: &str,
) -> SyncOutcome {
    let mut reporter = RecordingReporter::new();
    SyncEngine::new(source.root(), settings, store, &mut reporter)
        .sync_file(&NormalizedPath::new(relative))
        .unwrap()
}

fn dir_is_empty(dir: &std::path::Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn test_install_skip_then_backup_scenario() {
    let source = SourceTree::new().with_file("configA/app.yaml", "v1");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let dst = dest.path().join("configA/app.yaml");
    let rel = NormalizedPath::new("configA/app.yaml");

    // First sync installs.
    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings, &mut store, "configA/app.yaml");
    assert_eq!(outcome, SyncOutcome::Installed { backup: None });
    store.save().unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&rel).unwrap().digest, Digest::of_bytes(b"v1"));
    let after_first = fs::read_to_string(dest.path().join(TRACKING_FILE)).unwrap();

    // Second sync with nothing changed skips and leaves tracking untouched.
    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings, &mut store, "configA/app.yaml");
    assert_eq!(outcome, SyncOutcome::SkippedIdentical);
    store.save().unwrap();
    assert_eq!(fs::read_to_string(dest.path().join(TRACKING_FILE)).unwrap(), after_first);

    // Third sync with new content backs up the old one.
    source.write("configA/app.yaml", "v2");
    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings, &mut store, "configA/app.yaml");
    assert!(outcome.backed_up());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "v2");
    assert_eq!(
        fs::read_to_string(dest.path().join("configA/app.yaml.backup")).unwrap(),
        "v1"
    );
    assert_eq!(store.get(&rel).unwrap().digest, Digest::of_bytes(b"v2"));
}

#[test]
fn test_repeat_sync_keeps_record_identical() {
    let source = SourceTree::new().with_file("configA/app.yaml", "v1");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let rel = NormalizedPath::new("configA/app.yaml");

    let mut store = open_store(&dest);
    sync_file(&source, &settings, &mut store, "configA/app.yaml");
    let first = store.get(&rel).unwrap().clone();

    let outcome = sync_file(&source, &settings, &mut store, "configA/app.yaml");
    assert_eq!(outcome, SyncOutcome::SkippedIdentical);
    assert_eq!(store.get(&rel).unwrap(), &first);
}

#[test]
fn test_identical_untracked_file_becomes_tracked() {
    let source = SourceTree::new().with_file("configA/app.yaml", "same");
    let dest = TempDir::new().unwrap();
    ctx_test_utils::tree::write_file(dest.path(), "configA/app.yaml", "same");

    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings(true, true), &mut store, "configA/app.yaml");

    assert_eq!(outcome, SyncOutcome::SkippedIdentical);
    assert!(store.get(&NormalizedPath::new("configA/app.yaml")).is_some());
}

#[test]
fn test_existing_backup_is_overwritten() {
    let source = SourceTree::new().with_file("configA/app.yaml", "new");
    let dest = TempDir::new().unwrap();
    ctx_test_utils::tree::write_file(dest.path(), "configA/app.yaml", "mine");
    ctx_test_utils::tree::write_file(dest.path(), "configA/app.yaml.backup", "stale");

    let mut store = open_store(&dest);
    sync_file(&source, &settings(true, true), &mut store, "configA/app.yaml");

    assert_eq!(
        fs::read_to_string(dest.path().join("configA/app.yaml.backup")).unwrap(),
        "mine"
    );
}

#[rstest]
#[case::verification_off_backup_on(false, true)]
#[case::verification_off_backup_off(false, false)]
#[case::verification_on_backup_off(true, false)]
fn test_overwrite_without_backup(#[case] verify: bool, #[case] backup: bool) {
    let source = SourceTree::new().with_file("configA/app.yaml", "B");
    let dest = TempDir::new().unwrap();
    ctx_test_utils::tree::write_file(dest.path(), "configA/app.yaml", "A");

    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings(verify, backup), &mut store, "configA/app.yaml");

    assert_eq!(outcome, SyncOutcome::Installed { backup: None });
    assert_eq!(
        fs::read_to_string(dest.path().join("configA/app.yaml")).unwrap(),
        "B"
    );
    assert!(!dest.path().join("configA/app.yaml.backup").exists());
}

#[test]
fn test_verification_off_rewrites_identical_content() {
    let source = SourceTree::new().with_file("configA/app.yaml", "same");
    let dest = TempDir::new().unwrap();
    ctx_test_utils::tree::write_file(dest.path(), "configA/app.yaml", "same");

    let mut store = open_store(&dest);
    let outcome = sync_file(&source, &settings(false, true), &mut store, "configA/app.yaml");
    assert!(outcome.is_installed());
}

#[test]
fn test_disallowed_directory_writes_nothing() {
    let source = SourceTree::new().with_file("secrets/key.pem", "k");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let err = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_directory("secrets")
        .unwrap_err();

    assert!(matches!(err, Error::NotAllowed { ref name } if name == "secrets"));
    assert!(dir_is_empty(dest.path()));
    assert!(reporter.events.is_empty());
    assert_eq!(store.state(), StoreState::Loaded);
}

#[test]
fn test_check_directory_validates_before_any_store_exists() {
    let source = SourceTree::new()
        .with_file("configA/app.yaml", "v1")
        .with_file("secrets/key.pem", "k");
    let settings = settings(true, true);

    assert_eq!(
        settings.check_directory(source.root(), "configA").unwrap(),
        source.root().join("configA")
    );
    assert!(matches!(
        settings.check_directory(source.root(), "secrets"),
        Err(Error::NotAllowed { .. })
    ));
    assert!(matches!(
        settings.check_directory(source.root(), "configB"),
        Err(Error::NotFound { .. })
    ));
}

#[rstest]
#[case::missing("configB")]
#[case::not_a_directory("configA")]
fn test_directory_must_exist_in_source(#[case] name: &str) {
    let source = SourceTree::new().with_file("configA", "a file, not a directory");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let err = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_directory(name)
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[test]
fn test_sync_directory_skips_hidden_and_vcs_entries() {
    let source = SourceTree::new()
        .with_file("configA/app.yaml", "1")
        .with_file("configA/nested/deep.md", "2")
        .with_file("configA/.DS_Store", "x")
        .with_file("configA/.git/config", "x")
        .with_file("configA/.cache/hidden.md", "3");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let summary = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_directory("configA")
        .unwrap();

    assert_eq!(summary.installed, 3);
    let mut tracked: Vec<String> = store
        .list_tracked_paths()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    tracked.sort();
    assert_eq!(
        tracked,
        vec!["configA/.cache/hidden.md", "configA/app.yaml", "configA/nested/deep.md"]
    );
    assert!(!dest.path().join("configA/.DS_Store").exists());
    assert!(!dest.path().join("configA/.git").exists());
}

#[test]
fn test_hidden_top_level_directory_is_synced() {
    let source = SourceTree::new().with_file(".claude/commands/review.md", "r");
    let dest = TempDir::new().unwrap();
    let settings = SyncSettings {
        allowed: vec![".claude".to_string()],
        verify_checksums: true,
        backup_on_conflict: true,
    };
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_all()
        .unwrap();

    assert!(dest.path().join(".claude/commands/review.md").is_file());
}

#[test]
fn test_sync_all_continues_past_missing_directories() {
    let source = SourceTree::new().with_file("configB/b.md", "b");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let summary = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_all()
        .unwrap();

    assert_eq!(summary.missing_directories, vec!["configA".to_string()]);
    assert_eq!(summary.installed, 1);
    assert_eq!(
        reporter.events,
        vec![
            ReportEvent::DirectoryMissing("configA".to_string()),
            ReportEvent::SyncingDirectory("configB".to_string()),
            ReportEvent::Installed {
                path: NormalizedPath::new("configB/b.md"),
                backup: None,
            },
        ]
    );
}

#[test]
fn test_records_carry_source_label() {
    let source = SourceTree::new().with_file("configA/app.yaml", "v1");
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .with_source_label("https://example.com/configs.git#main")
        .sync_directory("configA")
        .unwrap();

    let record = store.get(&NormalizedPath::new("configA/app.yaml")).unwrap();
    assert_eq!(record.source, "https://example.com/configs.git#main");
    assert_eq!(record.size, 2);
}

#[test]
fn test_parent_traversal_is_rejected() {
    let source = SourceTree::new();
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let err = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_file(&NormalizedPath::new("../outside.md"))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidPath { .. }));
    assert!(matches!(reporter.events.as_slice(), [ReportEvent::FileFailed(..)]));
}

#[cfg(unix)]
#[test]
fn test_permissions_are_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let source = SourceTree::new();
    let script = source.write("configA/run.sh", "#!/bin/sh\n");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();
    let dest = TempDir::new().unwrap();

    let mut store = open_store(&dest);
    sync_file(&source, &settings(true, true), &mut store, "configA/run.sh");

    let mode = fs::metadata(dest.path().join("configA/run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[cfg(unix)]
#[test]
fn test_failure_stops_batch_and_keeps_earlier_files() {
    use std::os::unix::fs::PermissionsExt;

    let source = SourceTree::new()
        .with_file("configA/a.md", "a")
        .with_file("configA/c.md", "c");
    let locked = source.write("configA/b.md", "b");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits, nothing to assert in that case.
    if fs::read(&locked).is_ok() {
        return;
    }
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let result = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_directory("configA");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let err = result.unwrap_err();
    assert!(err.is_io(), "got {err:?}");
    assert!(dest.path().join("configA/a.md").exists());
    assert!(!dest.path().join("configA/c.md").exists());
    assert_eq!(store.list_tracked_paths(), vec![NormalizedPath::new("configA/a.md")]);
    assert!(matches!(reporter.events.last(), Some(ReportEvent::FileFailed(..))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_reported_per_file() {
    use std::os::unix::fs::PermissionsExt;

    let source = SourceTree::new()
        .with_file("configA/a.md", "a")
        .with_file("configA/locked/inner.md", "inner");
    let locked = source.root().join("configA/locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits, nothing to assert in that case.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }
    let dest = TempDir::new().unwrap();
    let settings = settings(true, true);
    let mut store = open_store(&dest);
    let mut reporter = RecordingReporter::new();

    let result = SyncEngine::new(source.root(), &settings, &mut store, &mut reporter)
        .sync_directory("configA");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(err.is_io(), "got {err:?}");
    assert_eq!(store.list_tracked_paths(), vec![NormalizedPath::new("configA/a.md")]);
    match reporter.events.last() {
        Some(ReportEvent::FileFailed(path, _)) => {
            assert_eq!(path, &NormalizedPath::new("configA/locked"))
        }
        other => panic!("expected a failure report, got {other:?}"),
    }
}
