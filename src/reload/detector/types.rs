use std::fmt;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Renamed,
    /// Backend could not say more than "something happened"
    Changed,
}

impl ChangeKind {
    /// Map a notify event kind, dropping kinds that carry no content change.
    ///
    /// Metadata-only modifications (chmod, mtime/atime touches) and access
    /// notifications (open/close) never produce a change.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Renamed),
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Access(_) => None,
            EventKind::Any | EventKind::Other => Some(Self::Changed),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
            Self::Changed => "changed",
        }
    }
}

/// A filtered, human-readable "something changed" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    kind: ChangeKind,
    path: PathBuf,
    description: String,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: PathBuf) -> Self {
        let description = format!("{}: {}", kind.label(), path.display());
        Self {
            kind,
            path,
            description,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
