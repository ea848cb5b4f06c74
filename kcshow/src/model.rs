//! Loading the serialized configuration tree and `.config` overlays.

use std::path::Path;

use anyhow::Context;
use kcoutline::data::{ConfigTree, Overlay, OverlayReport};
use tokio::fs;

/// Default model file, relative to the working directory.
pub const DEFAULT_MODEL: &str = "kconfig.json";

/// Reads a configuration tree, choosing JSON or TOML by extension.
pub async fn load_tree(path: &Path) -> anyhow::Result<ConfigTree> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config model {}", path.display()))?;
    let tree = ConfigTree::from_str_for_path(&text, path)
        .with_context(|| format!("failed to load config model {}", path.display()))?;
    info!(
        "Loaded `{}` with {} top-level nodes from {}",
        tree.mainmenu,
        tree.nodes.len(),
        path.display()
    );
    Ok(tree)
}

/// Reads a `.config` file.
pub async fn load_overlay(path: &Path) -> anyhow::Result<Overlay> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let overlay = Overlay::parse(&text).with_context(|| format!("in {}", path.display()))?;
    info!("Loaded {} values from {}", overlay.len(), path.display());
    Ok(overlay)
}

/// Loads the tree and applies the optional overlay to it.
pub async fn load_configured(
    model: &Path,
    overlay: Option<&Path>,
) -> anyhow::Result<(ConfigTree, Option<OverlayReport>)> {
    let mut tree = load_tree(model).await?;
    let report = match overlay {
        Some(path) => {
            let overlay = load_overlay(path).await?;
            let report = tree
                .apply_overlay(&overlay)
                .with_context(|| format!("failed to apply {}", path.display()))?;
            Some(report)
        }
        None => None,
    };
    Ok((tree, report))
}
