//! # kcoutline
//!
//! Counting tree walker and interactive HTML outline for Kconfig-style
//! configuration trees.
//!
//! A configuration tree (symbols, menus, choices, comments) is walked once
//! in document order. Every menu and choice gets its selectable/selected
//! totals plus running offsets, and the renderer turns those into a single
//! self-contained page: a collapsible outline with `selected/total`
//! counters and a navigation toolbox (expand/collapse all, hide disabled,
//! sort, jump to a menu with its ancestors expanded).
//!
//! ## Quick Start
//!
//! ```rust
//! use kcoutline::data::{ConfigTree, ConfigModel};
//! use kcoutline::render::{PageOptions, render_document};
//! use kcoutline::nav::NavigationIndex;
//!
//! let tree = ConfigTree::from_json_str(r#"{
//!     "nodes": [
//!         { "kind": "menu", "title": "General setup",
//!           "location": { "file": "init/Kconfig", "line": 12 },
//!           "children": [
//!             { "kind": "symbol", "name": "SWAP", "type": "bool", "value": "y" }
//!           ] }
//!     ]
//! }"#).unwrap();
//!
//! let html = render_document(&tree, &PageOptions::titled(tree.title())).unwrap();
//! let index = NavigationIndex::parse(&html).unwrap();
//! assert_eq!(index.entry("menu-init/Kconfig:12").unwrap().selected_count, 1);
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Tree nodes, the model provider trait and `.config` overlays
//! - [`walker`] - Recursive visitor with per-subtree scopes
//! - [`count`] - Counting rules and the counting walker
//! - [`render`] - HTML outline renderer and page template
//! - [`nav`] - Navigation index over rendered outlines

#[macro_use]
extern crate log;

/// Per-subtree totals.
pub mod count;

/// Configuration tree data structures.
pub mod data;

pub mod error;

/// Navigation index over rendered documents.
pub mod nav;

/// HTML outline renderer.
pub mod render;

/// Node-visiting protocol shared by counting and rendering.
pub mod walker;

#[cfg(test)]
mod fixtures;

/// Crate version, written into the generator tag of every page.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use count::{SubtreeCount, count_tree};
pub use data::{ConfigModel, ConfigNode, ConfigTree, Overlay};
pub use error::{Error, Result};
pub use nav::{NavigationIndex, SortKey};
pub use render::{PageOptions, render_document, render_outline};
