//! Live reload manager.
//!
//! Watches the content root and tells connected browsers to reload when a
//! matching file changes. Nothing is rebuilt here: a reload simply requests
//! the page again, which lists and compiles from scratch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use super::debouncer::{Change, ChangeKind, EventDebouncer};

/// Event sent to connected WebSocket clients when files change.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReloadEvent {
    /// Always "reload".
    #[serde(rename = "type")]
    event_type: String,
    /// URL path of the changed document.
    path: String,
}

const DEFAULT_WATCH_PATTERNS: &[&str] = &["**/*.md", "**/*.mkd"];
const DEBOUNCE: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Manages file watching and broadcasting reload events.
pub(crate) struct LiveReloadManager {
    root: PathBuf,
    patterns: Vec<glob::Pattern>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watcher: Option<RecommendedWatcher>,
}

impl LiveReloadManager {
    /// Create a manager for `root`.
    ///
    /// Without `watch_patterns`, markdown files at any depth are watched.
    /// Invalid patterns are logged and ignored.
    pub(crate) fn new(
        root: PathBuf,
        watch_patterns: Option<Vec<String>>,
        broadcaster: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        let patterns = watch_patterns
            .unwrap_or_else(|| DEFAULT_WATCH_PATTERNS.iter().map(|p| (*p).to_owned()).collect())
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!(pattern = %p, error = %err, "Ignoring invalid watch pattern");
                    None
                }
            })
            .collect();

        Self {
            root,
            patterns,
            broadcaster,
            watcher: None,
        }
    }

    /// Start watching.
    ///
    /// Spawns two tasks: one feeding raw events into the debouncer, one
    /// draining settled changes and broadcasting them.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher cannot be created or the root cannot
    /// be watched.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        // notify reports absolute paths
        let root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());

        let (tx, mut rx) = mpsc::channel::<Event>(100);
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(err) => tracing::warn!(error = %err, "File watcher error"),
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        let debouncer = Arc::new(EventDebouncer::new(DEBOUNCE));

        let recorder = Arc::clone(&debouncer);
        let patterns = self.patterns.clone();
        let record_root = root.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(&event, &record_root, &patterns, &recorder);
            }
        });

        let broadcaster = self.broadcaster.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                for change in debouncer.drain_ready() {
                    Self::broadcast_change(&change, &root, &broadcaster);
                }
            }
        });

        tracing::info!(root = %self.root.display(), "Live reload watching");
        Ok(())
    }

    fn record_event(
        event: &Event,
        root: &Path,
        patterns: &[glob::Pattern],
        debouncer: &EventDebouncer,
    ) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => return,
        };

        for path in &event.paths {
            if Self::matches_patterns(path, root, patterns) {
                tracing::debug!(path = %path.display(), ?kind, "Recorded filesystem event");
                debouncer.record(path.clone(), kind);
            }
        }
    }

    fn broadcast_change(
        change: &Change,
        root: &Path,
        broadcaster: &broadcast::Sender<ReloadEvent>,
    ) {
        let Some(path) = Self::url_path(&change.path, root) else {
            return;
        };

        tracing::info!(path = %path, kind = ?change.kind, "Broadcasting reload");
        // No receivers simply means no browser is connected
        let _ = broadcaster.send(ReloadEvent {
            event_type: "reload".to_owned(),
            path,
        });
    }

    /// URL path of a file under `root` (`/docs/a.md`).
    fn url_path(file_path: &Path, root: &Path) -> Option<String> {
        let relative = file_path.strip_prefix(root).ok()?;
        let segments: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();

        Some(format!("/{}", segments.join("/")))
    }

    fn matches_patterns(path: &Path, root: &Path, patterns: &[glob::Pattern]) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        patterns.iter().any(|pattern| pattern.matches_path(relative))
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_patterns() -> Vec<glob::Pattern> {
        let (tx, _rx) = broadcast::channel(1);
        LiveReloadManager::new(PathBuf::from("/notes"), None, tx).patterns
    }

    #[test]
    fn test_reload_event_serialization() {
        let event = ReloadEvent {
            event_type: "reload".to_owned(),
            path: "/docs/a.md".to_owned(),
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "reload");
        assert_eq!(json["path"], "/docs/a.md");
    }

    #[test]
    fn test_default_patterns_match_markdown() {
        let root = PathBuf::from("/notes");
        let patterns = default_patterns();

        assert!(LiveReloadManager::matches_patterns(
            Path::new("/notes/a.md"),
            &root,
            &patterns
        ));
        assert!(LiveReloadManager::matches_patterns(
            Path::new("/notes/deep/er/b.mkd"),
            &root,
            &patterns
        ));
        assert!(!LiveReloadManager::matches_patterns(
            Path::new("/notes/image.png"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_patterns_ignore_paths_outside_root() {
        let patterns = default_patterns();

        assert!(!LiveReloadManager::matches_patterns(
            Path::new("/other/a.md"),
            Path::new("/notes"),
            &patterns
        ));
    }

    #[test]
    fn test_invalid_patterns_are_dropped() {
        let (tx, _rx) = broadcast::channel(1);
        let manager = LiveReloadManager::new(
            PathBuf::from("/notes"),
            Some(vec!["[".to_owned(), "*.txt".to_owned()]),
            tx,
        );

        assert_eq!(manager.patterns.len(), 1);
    }

    #[test]
    fn test_url_path() {
        let root = Path::new("/notes");

        assert_eq!(
            LiveReloadManager::url_path(Path::new("/notes/docs/a.md"), root),
            Some("/docs/a.md".to_owned())
        );
        assert_eq!(
            LiveReloadManager::url_path(Path::new("/notes/a.md"), root),
            Some("/a.md".to_owned())
        );
        assert_eq!(
            LiveReloadManager::url_path(Path::new("/elsewhere/a.md"), root),
            None
        );
    }

    #[tokio::test]
    async fn test_broadcast_change_reaches_subscribers() {
        let (tx, _rx) = broadcast::channel(4);
        let manager = LiveReloadManager::new(PathBuf::from("/notes"), None, tx.clone());
        let mut receiver = manager.subscribe();

        LiveReloadManager::broadcast_change(
            &Change {
                path: PathBuf::from("/notes/docs/a.md"),
                kind: ChangeKind::Modified,
            },
            Path::new("/notes"),
            &tx,
        );

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.path, "/docs/a.md");
        assert_eq!(event.event_type, "reload");
    }
}
