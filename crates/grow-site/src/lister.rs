//! Navigation listing for a directory.
//!
//! [`DirectoryLister`] walks a directory under the content root and reports
//! what a reader can navigate to from there:
//!
//! 1. Markdown files directly inside the directory, as file entries
//! 2. Subdirectories holding markdown at any depth, folded into one
//!    `name/` entry each
//!
//! Entries are deduplicated and sorted by their display string, then the
//! `..` up-entry is prepended. The up-entry is present at the content root
//! too; following it is handled by the normal classification pipeline.
//!
//! Enumeration uses `**/*.md` and `**/*.mkd` glob patterns below the listed
//! directory. Hidden entries (leading `.`) are skipped. Symlinked directories
//! are followed; a symlink cycle ends where the OS stops resolving it.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::node::{MARKDOWN_SUFFIXES, PathNode};

/// Name of the synthetic "go up" entry.
pub const UP_ENTRY: &str = "..";

/// A navigable entry in a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    /// Entry relative to the listed directory (`a.md`, `sub/`, `../`).
    pub node: PathNode,
    /// Absolute link target for the entry.
    pub href: String,
}

impl ListingEntry {
    fn new(dir: &PathNode, node: PathNode) -> Self {
        let href = format!("{}{node}", dir.url());
        Self { node, href }
    }
}

/// Lists markdown-bearing entries of directories under a content root.
#[derive(Clone, Debug)]
pub struct DirectoryLister {
    root: PathBuf,
}

impl DirectoryLister {
    /// Create a lister for the given content root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root this lister resolves nodes against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the navigable entries of `dir`.
    ///
    /// A missing or markdown-free directory yields only the up-entry.
    /// Unreadable subdirectories are logged and skipped.
    #[must_use]
    pub fn list(&self, dir: &PathNode) -> Vec<ListingEntry> {
        let base = self.root.join(dir.to_relative_path());

        let mut nodes = BTreeMap::new();
        collect_nodes(&base, &mut nodes);

        let mut entries = Vec::with_capacity(nodes.len() + 1);
        entries.push(ListingEntry::new(dir, PathNode::classify(UP_ENTRY)));
        entries.extend(nodes.into_values().map(|node| ListingEntry::new(dir, node)));

        tracing::debug!(dir = %dir, entries = entries.len(), "Listed directory");
        entries
    }
}

/// Collect the entries below `base`, keyed by display string.
///
/// A match directly in `base` is kept as classified. A deeper match is folded
/// into a directory node for its first segment.
fn collect_nodes(base: &Path, nodes: &mut BTreeMap<String, PathNode>) {
    // Matches are stripped against this prefix, so `..` and `.` must be gone
    let base = match base.canonicalize() {
        Ok(base) => base,
        Err(err) => {
            tracing::debug!(path = %base.display(), error = %err, "Directory not readable");
            return;
        }
    };
    let Some(base_str) = base.to_str() else {
        tracing::warn!(path = %base.display(), "Skipping directory with non-UTF-8 path");
        return;
    };

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    for suffix in MARKDOWN_SUFFIXES {
        let pattern = format!("{}/**/*{suffix}", Pattern::escape(base_str));
        let paths = match glob::glob_with(&pattern, options) {
            Ok(paths) => paths,
            Err(err) => {
                tracing::warn!(pattern = %pattern, error = %err, "Invalid listing pattern");
                continue;
            }
        };

        for path in paths {
            match path {
                Ok(path) => insert_match(&base, &path, nodes),
                Err(err) => {
                    tracing::warn!(
                        path = %err.path().display(),
                        error = %err.error(),
                        "Skipping unreadable entry"
                    );
                }
            }
        }
    }
}

fn insert_match(base: &Path, path: &Path, nodes: &mut BTreeMap<String, PathNode>) {
    let Ok(relative) = path.strip_prefix(base) else {
        return;
    };
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let node = match segments.as_slice() {
        [] => return,
        [name] => PathNode::classify(name),
        [first, ..] => PathNode::directory(vec![first.clone()]),
    };
    nodes.insert(node.to_string(), node);
}
