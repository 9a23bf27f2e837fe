//! Request path classification.
//!
//! A [`PathNode`] is the typed form of a request path: an ordered list of
//! slash-free segments plus a [`NodeKind`] derived from the final segment's
//! suffix. Classification is pure string processing. Nothing here touches the
//! filesystem, so a node says nothing about whether its target exists.
//!
//! # Display
//!
//! | Raw request     | Kind      | Display     |
//! |-----------------|-----------|-------------|
//! | `""`, `"/"`     | Directory | `/`         |
//! | `"a/b"`         | Directory | `a/b/`      |
//! | `"/a/b/c.md"`   | File      | `a/b/c.md`  |

use std::fmt;
use std::path::PathBuf;

/// Suffixes that mark a markdown document.
pub const MARKDOWN_SUFFIXES: &[&str] = &[".md", ".mkd"];

/// Check whether a file name carries one of the [`MARKDOWN_SUFFIXES`].
#[must_use]
pub fn is_markdown(name: &str) -> bool {
    MARKDOWN_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Kind of a classified path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A markdown document.
    File,
    /// Anything else, including the content root.
    Directory,
}

/// A classified location relative to the content root.
///
/// Outside this crate, nodes can only be built through [`PathNode::classify`]
/// and [`PathNode::root`]. Inside it, container nodes (parents and folded
/// listing entries) are always directories, whatever their last segment says.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathNode {
    segments: Vec<String>,
    kind: NodeKind,
}

impl PathNode {
    /// The directory node for the content root.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            kind: NodeKind::Directory,
        }
    }

    /// A directory node from already-split segments, bypassing the suffix rule.
    pub(crate) fn directory(segments: Vec<String>) -> Self {
        Self {
            segments,
            kind: NodeKind::Directory,
        }
    }

    /// Classify a raw request path.
    ///
    /// Separators are stripped from both ends and empty segments dropped.
    /// The node is a [`NodeKind::File`] when its last segment ends in a
    /// markdown suffix, otherwise a [`NodeKind::Directory`]. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_site::{NodeKind, PathNode};
    ///
    /// assert_eq!(PathNode::classify("/a/b/c.md").kind(), NodeKind::File);
    /// assert_eq!(PathNode::classify("a/b").to_string(), "a/b/");
    /// assert!(PathNode::classify("").is_root());
    /// ```
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let segments: Vec<String> = raw
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();

        let kind = match segments.last() {
            Some(last) if is_markdown(last) => NodeKind::File,
            _ => NodeKind::Directory,
        };

        Self { segments, kind }
    }

    /// The containing directory of this node.
    ///
    /// Directories are their own parent. A file's parent is the directory
    /// formed by its remaining segments; a file with no directory component
    /// yields the root.
    #[must_use]
    pub fn parent(&self) -> Self {
        match self.kind {
            NodeKind::Directory => self.clone(),
            NodeKind::File => Self::directory(self.segments[..self.segments.len() - 1].to_vec()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// True for the content root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Filesystem path relative to the content root.
    ///
    /// `..` segments are kept as-is; no normalization happens here.
    #[must_use]
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Absolute URL path (`/`, `/docs/`, `/docs/a.md`).
    #[must_use]
    pub fn url(&self) -> String {
        if self.is_root() {
            "/".to_owned()
        } else {
            format!("/{self}")
        }
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.segments.join("/");
        match self.kind {
            NodeKind::File => f.write_str(&joined),
            NodeKind::Directory if joined.is_empty() => f.write_str("/"),
            NodeKind::Directory => write!(f, "{joined}/"),
        }
    }
}
