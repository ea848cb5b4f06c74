//! Error types shared by every stage of the outline pipeline.

use thiserror::Error;

use crate::data::Location;

/// Errors raised while loading, walking, rendering or indexing a
/// configuration tree.
#[derive(Debug, Error)]
pub enum Error {
    /// A choice contains something other than member symbols.
    #[error("choice `{choice}` at {location} contains a {kind} node; only symbols may be choice members")]
    ChoiceChild {
        /// Prompt of the offending choice.
        choice: String,
        /// Source location of the choice.
        location: Location,
        /// Kind of the misplaced child.
        kind: &'static str,
    },

    /// A bool/tristate symbol carries a value outside `n`, `m`, `y`.
    #[error("symbol `{name}` of type {ty} has invalid value `{value}` (expected n, m or y)")]
    InvalidValue {
        /// Symbol name.
        name: String,
        /// Declared type.
        ty: &'static str,
        /// Offending value.
        value: String,
    },

    /// A symbol was declared without a name.
    #[error("symbol declared at {0} has no name")]
    MissingName(String),

    /// A choice names a selection that is not one of its members.
    #[error("choice `{choice}` at {location} selects `{selection}`, which is not one of its members")]
    UnknownSelection {
        /// Prompt of the choice.
        choice: String,
        /// Source location of the choice.
        location: Location,
        /// Name given as the selection.
        selection: String,
    },

    /// Two menus or choices derive the same anchor identifier.
    #[error("anchor `{0}` is derived by more than one menu or choice")]
    DuplicateAnchor(String),

    /// The config model could not be decoded from JSON.
    #[error("invalid JSON config model: {0}")]
    Json(#[from] serde_json::Error),

    /// The config model could not be decoded from TOML.
    #[error("invalid TOML config model: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config model file extension is not a supported format.
    #[error("unsupported config model format: {0:?}")]
    UnsupportedFormat(String),

    /// A `.config` overlay line could not be understood.
    #[error("overlay line {line}: {reason}")]
    Overlay {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The rendered document could not be loaded back.
    #[error("malformed outline document: {0}")]
    Document(String),

    /// A menu/choice control lacks one of its structured data attributes.
    #[error("control `{anchor}` has a missing or non-numeric `{attr}` attribute")]
    MissingData {
        /// Anchor identifier of the control.
        anchor: String,
        /// Attribute name.
        attr: &'static str,
    },

    /// Navigation was requested to an anchor that is not indexed.
    #[error("no menu or choice with anchor `{0}`")]
    UnknownAnchor(String),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Document(e.to_string())
    }
}
