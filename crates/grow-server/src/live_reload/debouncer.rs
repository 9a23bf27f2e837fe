//! Event debouncing for live reload.
//!
//! Editors emit several filesystem events per save. The debouncer keeps one
//! pending change per path and releases it once no new event for that path
//! arrived within the debounce window.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Kind of filesystem change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A settled change, ready to broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Change {
    pub(crate) path: PathBuf,
    pub(crate) kind: ChangeKind,
}

struct Pending {
    kind: ChangeKind,
    due: Instant,
}

/// Thread-safe per-path event debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    window: Duration,
}

impl EventDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record an event observed now.
    pub(crate) fn record(&self, path: PathBuf, kind: ChangeKind) {
        self.record_at(path, kind, Instant::now());
    }

    fn record_at(&self, path: PathBuf, kind: ChangeKind, now: Instant) {
        let due = now + self.window;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        match pending.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(Pending { kind, due });
            }
            Entry::Occupied(mut slot) => match merge(slot.get().kind, kind) {
                Some(merged) => {
                    *slot.get_mut() = Pending { kind: merged, due };
                }
                None => {
                    slot.remove();
                }
            },
        }
    }

    /// Remove and return changes whose window has elapsed.
    pub(crate) fn drain_ready(&self) -> Vec<Change> {
        self.drain_ready_at(Instant::now())
    }

    fn drain_ready_at(&self, now: Instant) -> Vec<Change> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        let mut ready = Vec::new();
        pending.retain(|path, event| {
            if event.due <= now {
                ready.push(Change {
                    path: path.clone(),
                    kind: event.kind,
                });
                false
            } else {
                true
            }
        });
        ready
    }
}

/// Combine a pending change with a newer one for the same path.
///
/// `None` means the two cancel out: a file created and removed inside one
/// window never existed as far as readers are concerned.
fn merge(pending: ChangeKind, newer: ChangeKind) -> Option<ChangeKind> {
    use ChangeKind::{Created, Modified, Removed};

    match (pending, newer) {
        (Created, Removed) => None,
        (Created, _) => Some(Created),
        (Removed, Created) => Some(Modified),
        (Removed, _) | (Modified, Removed) => Some(Removed),
        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(100);

    fn change(path: &str, kind: ChangeKind) -> Change {
        Change {
            path: PathBuf::from(path),
            kind,
        }
    }

    #[test]
    fn test_change_released_after_window() {
        let debouncer = EventDebouncer::new(WINDOW);
        let start = Instant::now();

        debouncer.record_at(PathBuf::from("/notes/a.md"), ChangeKind::Modified, start);

        assert!(debouncer.drain_ready_at(start).is_empty());
        assert_eq!(
            debouncer.drain_ready_at(start + WINDOW),
            vec![change("/notes/a.md", ChangeKind::Modified)]
        );
        assert!(debouncer.drain_ready_at(start + WINDOW * 2).is_empty());
    }

    #[test]
    fn test_burst_is_coalesced_and_extends_window() {
        let debouncer = EventDebouncer::new(WINDOW);
        let start = Instant::now();
        let path = PathBuf::from("/notes/a.md");

        debouncer.record_at(path.clone(), ChangeKind::Modified, start);
        debouncer.record_at(path.clone(), ChangeKind::Modified, start + WINDOW / 2);

        assert!(debouncer.drain_ready_at(start + WINDOW).is_empty());
        assert_eq!(debouncer.drain_ready_at(start + WINDOW * 2).len(), 1);
    }

    #[test]
    fn test_created_then_removed_cancels() {
        let debouncer = EventDebouncer::new(WINDOW);
        let start = Instant::now();
        let path = PathBuf::from("/notes/tmp.md");

        debouncer.record_at(path.clone(), ChangeKind::Created, start);
        debouncer.record_at(path, ChangeKind::Removed, start);

        assert!(debouncer.drain_ready_at(start + WINDOW).is_empty());
    }

    #[test]
    fn test_paths_are_independent() {
        let debouncer = EventDebouncer::new(WINDOW);
        let start = Instant::now();

        debouncer.record_at(PathBuf::from("/notes/a.md"), ChangeKind::Modified, start);
        debouncer.record_at(PathBuf::from("/notes/b.md"), ChangeKind::Created, start);

        let mut ready = debouncer.drain_ready_at(start + WINDOW);
        ready.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            ready,
            vec![
                change("/notes/a.md", ChangeKind::Modified),
                change("/notes/b.md", ChangeKind::Created),
            ]
        );
    }

    #[test]
    fn test_merge_table() {
        use ChangeKind::{Created, Modified, Removed};

        assert_eq!(merge(Created, Created), Some(Created));
        assert_eq!(merge(Created, Modified), Some(Created));
        assert_eq!(merge(Created, Removed), None);

        assert_eq!(merge(Modified, Created), Some(Created));
        assert_eq!(merge(Modified, Modified), Some(Modified));
        assert_eq!(merge(Modified, Removed), Some(Removed));

        // Editors that save by replacing the file
        assert_eq!(merge(Removed, Created), Some(Modified));
        assert_eq!(merge(Removed, Modified), Some(Removed));
        assert_eq!(merge(Removed, Removed), Some(Removed));
    }
}
