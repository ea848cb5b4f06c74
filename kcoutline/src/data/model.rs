use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    data::{ConfigNode, Overlay, overlay::OverlayReport},
    error::{Error, Result},
};

/// Source of the configuration tree handed to the walker.
///
/// Parsing the Kconfig language itself happens elsewhere; a provider only
/// has to expose the already-resolved tree.
pub trait ConfigModel {
    /// Nodes at the top of the tree, in declaration order.
    fn top_level(&self) -> &[ConfigNode];

    /// Main menu title.
    fn title(&self) -> &str {
        "Linux Kernel Configuration"
    }
}

/// A serialized configuration tree.
///
/// ```rust
/// use kcoutline::data::{ConfigModel, ConfigTree};
///
/// let tree = ConfigTree::from_json_str(r#"{
///     "nodes": [
///         { "kind": "symbol", "name": "64BIT", "type": "bool", "value": "y" }
///     ]
/// }"#).unwrap();
/// assert_eq!(tree.top_level().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigTree {
    /// Main menu title.
    #[serde(default = "default_title")]
    pub mainmenu: String,
    /// Top-level nodes.
    #[serde(default)]
    pub nodes: Vec<ConfigNode>,
}

fn default_title() -> String {
    "Linux Kernel Configuration".to_string()
}

impl ConfigTree {
    /// Creates a tree from its top-level nodes.
    pub fn new(nodes: impl IntoIterator<Item = ConfigNode>) -> Self {
        Self {
            mainmenu: default_title(),
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Decodes a tree from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Decodes a tree from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Decodes a tree, choosing the format from `path`'s extension.
    pub fn from_str_for_path(s: &str, path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext {
            "json" => Self::from_json_str(s),
            "toml" => Self::from_toml_str(s),
            _ => Err(Error::UnsupportedFormat(ext.to_string())),
        }
    }

    /// JSON Schema describing the serialized tree.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ConfigTree);
        serde_json::to_value(&schema).unwrap_or_default()
    }

    /// Applies a pre-selection overlay to every matching symbol.
    pub fn apply_overlay(&mut self, overlay: &Overlay) -> Result<OverlayReport> {
        overlay.apply(&mut self.nodes)
    }
}

impl ConfigModel for ConfigTree {
    fn top_level(&self) -> &[ConfigNode] {
        &self.nodes
    }

    fn title(&self) -> &str {
        &self.mainmenu
    }
}

impl ConfigModel for [ConfigNode] {
    fn top_level(&self) -> &[ConfigNode] {
        self
    }
}

impl ConfigModel for Vec<ConfigNode> {
    fn top_level(&self) -> &[ConfigNode] {
        self
    }
}
