// src/watch/event.rs

use std::path::PathBuf;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

/// Coarse classification of a filesystem notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File contents were written. The only kind that triggers commands.
    Write,
    Create,
    Remove,
    Rename,
    /// Permission or other metadata change.
    Chmod,
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            // Some backends cannot tell what kind of modification happened;
            // treat that as a write.
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::Write
            }
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Chmod,
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            _ => ChangeKind::Other,
        }
    }
}

/// One path touched by one filesystem notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Whether this event should dispatch the watcher's command group.
    pub fn is_write(&self) -> bool {
        self.kind == ChangeKind::Write
    }

    /// Split a native event into one `ChangeEvent` per affected path.
    pub fn from_notify(event: &Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from(&event.kind);
        event
            .paths
            .iter()
            .map(|p| ChangeEvent::new(p.clone(), kind))
            .collect()
    }
}
