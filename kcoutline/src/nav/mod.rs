//! Navigation over a rendered outline.
//!
//! The browser runtime embedded in every page (`assets/navigation.js`)
//! and [`NavigationIndex`] implement the same operations on the same
//! structure: the index is built from the `.subtree` controls and their
//! `data-*` attributes, and a control's parent is the nearest menu/choice
//! control preceding the list that holds it.

/// Element tree loaded from rendered markup.
pub mod dom;
mod index;

pub use dom::{Document, NodeId};
pub use index::{NavigationEntry, NavigationIndex, SortKey};
