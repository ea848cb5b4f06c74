//! Application context and state management.
//!
//! [`AppContext`] holds everything one `kcshow` run needs: resolved paths,
//! the settings file contents and the environment values (kernel version,
//! architecture) that only feed the page title and placeholders.

use std::path::{Path, PathBuf};

use anyhow::Context;
use kcoutline::{
    count::SubtreeCount,
    data::{ConfigTree, OverlayReport},
    render::{Outline, PageOptions, render_outline},
};
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    model,
    settings::{SETTINGS_FILE, Settings, Vars, expand_placeholders},
};

/// Built-in fallbacks for values nobody supplied.
pub const DEFAULT_ARCH: &str = "x86_64";
pub const DEFAULT_SRCARCH: &str = "x86";
pub const DEFAULT_KERNEL_VERSION: &str = "unknown";
pub const DEFAULT_TITLE: &str = "Kernel configuration for ${version}";

/// Values given on the command line or through the environment.
///
/// Each `Some` wins over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub overlay: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub kernel_version: Option<String>,
    pub arch: Option<String>,
    pub srcarch: Option<String>,
}

/// Path configuration grouping all path-related fields.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Directory relative paths are resolved against.
    pub workdir: PathBuf,
    /// Settings file that was consulted.
    pub settings: PathBuf,
    /// Serialized configuration tree.
    pub model: PathBuf,
    /// `.config` overlay, if any.
    pub overlay: Option<PathBuf>,
    /// Output document; standard output when `None`.
    pub output: Option<PathBuf>,
}

/// Totals of one run, for the closing summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub counts: SubtreeCount,
    pub overlay: Option<OverlayReport>,
    pub output: Option<PathBuf>,
    pub bytes: usize,
}

/// The main application context holding all state.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub paths: PathConfig,
    /// Raw settings file contents.
    pub settings: Settings,
    /// Resolved kernel version and architectures.
    pub vars: Vars,
    /// Resolved document title.
    pub title: String,
}

impl AppContext {
    /// Reads the settings file and resolves every value.
    ///
    /// `config` defaults to `.kcshow.toml` inside `workdir`; a missing
    /// default file is fine, a missing explicit one is not.
    pub async fn load(
        workdir: PathBuf,
        config: Option<PathBuf>,
        overrides: Overrides,
    ) -> anyhow::Result<Self> {
        let explicit = config.is_some();
        let settings_path = match config {
            Some(path) => workdir.join(path),
            None => workdir.join(SETTINGS_FILE),
        };
        let settings = match Settings::load(&settings_path).await? {
            Some(settings) => settings,
            None if explicit => {
                anyhow::bail!("settings file {} does not exist", settings_path.display())
            }
            None => Settings::default(),
        };
        Ok(Self::resolve(workdir, settings_path, settings, overrides))
    }

    /// Applies the precedence overrides > settings > defaults.
    pub fn resolve(
        workdir: PathBuf,
        settings_path: PathBuf,
        settings: Settings,
        overrides: Overrides,
    ) -> Self {
        let vars = Vars {
            version: pick(
                overrides.kernel_version,
                &settings.kernel_version,
                DEFAULT_KERNEL_VERSION,
            ),
            arch: pick(overrides.arch, &settings.arch, DEFAULT_ARCH),
            srcarch: pick(overrides.srcarch, &settings.srcarch, DEFAULT_SRCARCH),
        };

        let mut ctx = Self {
            paths: PathConfig {
                workdir,
                settings: settings_path,
                ..Default::default()
            },
            settings,
            vars,
            title: String::new(),
        };

        let title = overrides
            .title
            .or_else(|| ctx.settings.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        ctx.title = ctx.value_replace_with_var(&title);

        let model = match overrides.model {
            Some(path) => path,
            None => PathBuf::from(
                ctx.settings
                    .model
                    .as_deref()
                    .unwrap_or(model::DEFAULT_MODEL),
            ),
        };
        ctx.paths.model = ctx.resolve_path(&model);

        let output = overrides
            .output
            .or_else(|| ctx.settings.output.as_deref().map(PathBuf::from));
        ctx.paths.output = output.map(|p| ctx.resolve_path(&p));
        ctx.paths.overlay = overrides.overlay.map(|p| ctx.resolve_path(&p));

        debug!("resolved context: {ctx:?}");
        ctx
    }

    /// Replaces `${version}`, `${arch}`, `${srcarch}` and `${env:NAME}`.
    pub fn value_replace_with_var(&self, value: &str) -> String {
        expand_placeholders(value, &self.vars)
    }

    /// Expands placeholders in `path` and anchors it at the working
    /// directory when relative.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        let expanded = PathBuf::from(self.value_replace_with_var(&path.to_string_lossy()));
        if expanded.is_absolute() {
            expanded
        } else {
            self.paths.workdir.join(expanded)
        }
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions::titled(&self.title)
    }

    /// Loads the model and applies the overlay, if any.
    pub async fn load_model(&self) -> anyhow::Result<(ConfigTree, Option<OverlayReport>)> {
        model::load_configured(&self.paths.model, self.paths.overlay.as_deref()).await
    }

    /// Renders `tree`; the outline carries the tree totals as well.
    pub fn render(&self, tree: &ConfigTree) -> anyhow::Result<Outline> {
        let outline = render_outline(tree)
            .with_context(|| format!("failed to render {}", self.paths.model.display()))?;
        Ok(outline)
    }

    /// Writes the document to the output file, or to standard output.
    pub async fn write_output(&self, html: &str) -> anyhow::Result<()> {
        match &self.paths.output {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent).await?;
                }
                fs::write(path, html)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Wrote {} bytes to {}", html.len(), path.display());
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(html.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        Ok(())
    }

    /// Loads, renders and writes one document.
    pub async fn run(&self) -> anyhow::Result<Summary> {
        let (tree, overlay) = self.load_model().await?;
        let outline = self.render(&tree)?;
        let html = outline.to_document(&self.page_options());
        self.write_output(&html).await?;
        Ok(Summary {
            counts: outline.counts,
            overlay,
            output: self.paths.output.clone(),
            bytes: html.len(),
        })
    }
}

fn pick(over: Option<String>, file: &Option<String>, default: &str) -> String {
    over.or_else(|| file.clone())
        .unwrap_or_else(|| default.to_string())
}
