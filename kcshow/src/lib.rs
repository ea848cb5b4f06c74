//! # kcshow
//!
//! Renders a kernel configuration tree as one self-contained, interactive
//! HTML page.
//!
//! The tree is read from a serialized config model (JSON or TOML, see
//! [`kcoutline::data::ConfigTree`]), optionally pre-selected from a
//! `.config` file, and handed to [`kcoutline`] for counting and rendering.
//!
//! ## Modules
//!
//! - [`ctx`] - Application context: paths, settings and environment values
//! - [`model`] - Loading the config model and `.config` overlays
//! - [`settings`] - The `.kcshow.toml` settings file and placeholders

#[macro_use]
extern crate log;

/// Application context and state management.
pub mod ctx;

/// Config model and overlay loaders.
pub mod model;

/// Settings file and placeholder expansion.
pub mod settings;
