//! Configuration tree data structures.
//!
//! This module holds the read-only input of the outline pipeline:
//!
//! - [`node`] - the tagged node union (symbol, menu, choice, comment)
//! - [`model`] - the [`ConfigModel`] provider trait and the serialized [`ConfigTree`]
//! - [`overlay`] - `.config` pre-selection overlays

/// Node types of the configuration tree.
pub mod node;

/// Config-model provider trait and its serde-backed implementation.
pub mod model;

/// `.config` overlays applied before rendering.
pub mod overlay;

pub use model::{ConfigModel, ConfigTree};
pub use node::{Choice, Comment, ConfigNode, Location, Menu, Symbol, SymbolType};
pub use overlay::{Overlay, OverlayReport};
