//! Settings file types.
//!
//! Settings are read from `.kcshow.toml` in the working directory unless
//! another file is given with `--config`:
//!
//! ```toml
//! model = "build/kconfig.json"
//! output = "kconfig-${version}.html"
//! title = "Kernel configuration for ${version} (${arch})"
//! arch = "arm64"
//! srcarch = "arm64"
//! ```
//!
//! Every field is optional; command-line flags and the `KERNELVERSION`,
//! `ARCH` and `SRCARCH` environment variables take precedence.

use std::path::Path;

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Default settings file name.
pub const SETTINGS_FILE: &str = ".kcshow.toml";

/// Contents of the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Serialized configuration tree (`.json` or `.toml`).
    pub model: Option<String>,
    /// Where to write the document. Standard output when unset.
    pub output: Option<String>,
    /// Document title.
    pub title: Option<String>,
    /// Kernel version shown in the default title.
    pub kernel_version: Option<String>,
    /// Target architecture (`ARCH`).
    pub arch: Option<String>,
    /// Source architecture directory (`SRCARCH`).
    pub srcarch: Option<String>,
}

impl Settings {
    /// Reads settings from `path`.
    ///
    /// A missing file yields `None`; an unreadable or malformed one is an
    /// error.
    pub async fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            debug!("no settings file at {}", path.display());
            return Ok(None);
        }
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = Self::from_toml_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(Some(settings))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// JSON Schema of the settings file.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Settings);
        serde_json::to_value(&schema).unwrap_or_default()
    }
}

/// Values available to `${...}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    pub version: String,
    pub arch: String,
    pub srcarch: String,
}

impl Vars {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "version" => Some(self.version.clone()),
            "arch" => Some(self.arch.clone()),
            "srcarch" => Some(self.srcarch.clone()),
            _ => {
                // Unset variables expand to nothing.
                let var = name.strip_prefix("env:")?;
                Some(std::env::var(var).unwrap_or_default())
            }
        }
    }
}

/// Expands `${version}`, `${arch}`, `${srcarch}` and `${env:NAME}`.
///
/// Unknown or unterminated placeholders are kept as written.
pub fn expand_placeholders(input: &str, vars: &Vars) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };
        let name = &after[..end];
        match vars.lookup(name) {
            Some(value) => result.push_str(&value),
            None => {
                result.push_str("${");
                result.push_str(name);
                result.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}
