use regex::Regex;

use super::types::{ChangeEvent, ChangeKind};

/// Turn one raw notify event into at most one [`ChangeEvent`].
///
/// Returns `None` for kinds without content implication and for events
/// whose paths all fail the pattern. When several paths are attached
/// (rename pairs), the first matching one is reported.
pub(super) fn classify(event: &notify::Event, pattern: &Regex) -> Option<ChangeEvent> {
    let kind = ChangeKind::from_event_kind(&event.kind)?;

    let path = event
        .paths
        .iter()
        .find(|p| pattern.is_match(&p.to_string_lossy()))?;

    Some(ChangeEvent::new(kind, path.clone()))
}
