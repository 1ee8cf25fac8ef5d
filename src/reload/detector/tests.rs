use std::path::PathBuf;
use std::time::Duration;

use notify::EventKind;
use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use regex::Regex;
use tempfile::TempDir;

use super::classify::classify;
use super::types::ChangeKind;
use super::ChangeDetector;
use crate::config::{DEFAULT_PATTERN, WatchSpec};

const WAIT: Duration = Duration::from_secs(5);

fn make_event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Any))
}

fn default_pattern() -> Regex {
    Regex::new(DEFAULT_PATTERN).unwrap()
}

#[test]
fn test_matching_write_produces_one_event() {
    let event = make_event(vec!["/site/index.md"], modify_kind());
    let change = classify(&event, &default_pattern()).unwrap();

    assert_eq!(change.kind(), ChangeKind::Modified);
    assert_eq!(change.path(), PathBuf::from("/site/index.md"));
    assert_eq!(change.description(), "modified: /site/index.md");
}

#[test]
fn test_non_matching_path_discarded() {
    let event = make_event(vec!["/site/app.js"], modify_kind());
    assert!(classify(&event, &default_pattern()).is_none());
}

#[test]
fn test_metadata_change_discarded() {
    let event = make_event(
        vec!["/site/index.md"],
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
    );
    assert!(classify(&event, &default_pattern()).is_none());

    let event = make_event(
        vec!["/site/index.md"],
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
    );
    assert!(classify(&event, &default_pattern()).is_none());
}

#[test]
fn test_access_discarded() {
    let event = make_event(vec!["/site/index.md"], EventKind::Access(AccessKind::Any));
    assert!(classify(&event, &default_pattern()).is_none());
}

#[test]
fn test_kinds_are_labelled() {
    let pattern = default_pattern();
    let cases = [
        (EventKind::Create(CreateKind::File), ChangeKind::Created),
        (EventKind::Remove(RemoveKind::File), ChangeKind::Removed),
        (
            EventKind::Modify(ModifyKind::Name(notify::event::RenameMode::Both)),
            ChangeKind::Renamed,
        ),
        (EventKind::Any, ChangeKind::Changed),
        (EventKind::Other, ChangeKind::Changed),
    ];

    for (kind, expected) in cases {
        let change = classify(&make_event(vec!["/site/a.css"], kind), &pattern).unwrap();
        assert_eq!(change.kind(), expected);
        assert!(change.description().starts_with(expected.label()));
    }
}

#[test]
fn test_rename_reports_first_matching_path() {
    let event = make_event(
        vec!["/site/draft.tmp", "/site/post.md"],
        EventKind::Modify(ModifyKind::Name(notify::event::RenameMode::Both)),
    );
    let change = classify(&event, &default_pattern()).unwrap();
    assert_eq!(change.path(), PathBuf::from("/site/post.md"));
}

#[test]
fn test_custom_pattern() {
    let pattern = Regex::new(r"\.txt$").unwrap();
    assert!(classify(&make_event(vec!["/site/a.txt"], modify_kind()), &pattern).is_some());
    assert!(classify(&make_event(vec!["/site/a.md"], modify_kind()), &pattern).is_none());
}

#[test]
fn test_detector_reports_matching_file() {
    let dir = TempDir::new().unwrap();
    let spec = WatchSpec::new(dir.path(), DEFAULT_PATTERN).unwrap();
    let detector = ChangeDetector::spawn(&spec).unwrap();

    // Non-matching write first: the first event seen must be the markdown one.
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    std::fs::write(dir.path().join("index.md"), "# Hello").unwrap();

    let change = detector.events().recv_timeout(WAIT).unwrap();
    assert!(change.description().contains("index.md"));
    assert!(change.path().ends_with("index.md"));

    detector.cancel();
}

#[test]
fn test_detector_cancel_ends_sequence() {
    let dir = TempDir::new().unwrap();
    let spec = WatchSpec::new(dir.path(), DEFAULT_PATTERN).unwrap();
    let detector = ChangeDetector::spawn(&spec).unwrap();
    let events = detector.events().clone();

    detector.cancel();

    // Writes after cancellation are not observed; the channel disconnects.
    std::fs::write(dir.path().join("index.md"), "# Late").unwrap();
    loop {
        match events.recv_timeout(WAIT) {
            Ok(_) => continue,
            Err(e) => {
                assert!(e.is_disconnected());
                break;
            }
        }
    }
}

#[test]
fn test_detector_missing_root_fails_to_spawn() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("site");
    std::fs::create_dir(&root).unwrap();
    let spec = WatchSpec::new(&root, DEFAULT_PATTERN).unwrap();
    std::fs::remove_dir(&root).unwrap();

    assert!(ChangeDetector::spawn(&spec).is_err());
}
