//! Markdown tree browsing for grow.
//!
//! This crate holds the request pipeline behind every page:
//!
//! - [`PathNode`]: classifies a raw request path as a file or directory
//! - [`DirectoryLister`]: lists the markdown-bearing entries of a directory
//! - [`Compiler`] / [`CommandCompiler`]: runs the external markdown compiler
//! - [`PageRenderer`]: composes the three into a [`PageModel`]
//!
//! All paths are resolved against a content root given at construction.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use grow_site::{Body, CommandCompiler, PageRenderer};
//!
//! let compiler = Arc::new(CommandCompiler::new("unidoc", "notes"));
//! let renderer = PageRenderer::new("notes", compiler);
//!
//! let page = renderer.render("/journal/today.md");
//! if let Body::Content(html) = &page.body {
//!     println!("{html}");
//! }
//! ```

mod compiler;
mod lister;
mod node;
mod renderer;

pub use compiler::{CommandCompiler, CompileError, CompileResult, Compiler};
pub use lister::{DirectoryLister, ListingEntry, UP_ENTRY};
pub use node::{MARKDOWN_SUFFIXES, NodeKind, PathNode, is_markdown};
pub use renderer::{Body, PageModel, PageRenderer};
