//! Page composition.
//!
//! [`PageRenderer`] turns a request path into a [`PageModel`]: the classified
//! node as heading, the sibling listing of its parent directory, and a body
//! that is either a placeholder (directories) or the compiler's outcome
//! (files). Every call starts from scratch; nothing is cached.

use std::path::PathBuf;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::lister::{DirectoryLister, ListingEntry};
use crate::node::PathNode;

/// Suffix appended to page titles.
const TITLE_SUFFIX: &str = "grow.md";

/// Main panel of a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// Informational note naming the directory being viewed.
    Placeholder(String),
    /// Compiler output. Trusted markup, embedded without escaping.
    Content(String),
    /// Compiler diagnostics or a failure to run the compiler. Plain text.
    Error(String),
}

/// Everything needed to draw one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageModel {
    /// The classified request path.
    pub heading: PathNode,
    /// Entries of the heading's parent directory.
    pub entries: Vec<ListingEntry>,
    pub body: Body,
}

impl PageModel {
    /// Document title, e.g. `docs/a.md - grow.md`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - {TITLE_SUFFIX}", self.heading)
    }
}

/// Composes listing and compiler output into pages.
pub struct PageRenderer {
    lister: DirectoryLister,
    compiler: Arc<dyn Compiler>,
}

impl PageRenderer {
    /// Create a renderer for the content root using `compiler` for files.
    pub fn new(root: impl Into<PathBuf>, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            lister: DirectoryLister::new(root),
            compiler,
        }
    }

    /// Render the page for a raw request path.
    ///
    /// Never fails: missing directories list as empty and compiler failures
    /// become [`Body::Error`].
    #[must_use]
    pub fn render(&self, request_path: &str) -> PageModel {
        let heading = PathNode::classify(request_path);
        tracing::info!(path = %heading, is_file = heading.is_file(), "Rendering page");

        let entries = self.lister.list(&heading.parent());
        let body = self.render_body(&heading);

        PageModel {
            heading,
            entries,
            body,
        }
    }

    fn render_body(&self, node: &PathNode) -> Body {
        if node.is_dir() {
            return Body::Placeholder(node.to_string());
        }

        match self.compiler.compile(node) {
            Ok(result) if result.success() => Body::Content(result.stdout),
            Ok(result) => {
                tracing::warn!(path = %node, status = result.status, "Markdown compilation failed");
                Body::Error(result.stderr)
            }
            Err(err) => {
                tracing::warn!(path = %node, error = %err, "Markdown compiler unavailable");
                Body::Error(err.to_string())
            }
        }
    }
}
