use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use kcoutline::data::ConfigTree;
use kcshow::{
    ctx::{AppContext, Overrides, Summary},
    settings::Settings,
};
use log::LevelFilter;

/// Render a kernel configuration tree as an interactive HTML outline.
#[derive(Parser, Debug)]
#[command(name = "kcshow", version, about, long_about = None)]
struct Cli {
    /// `.config` file whose values are applied before rendering
    overlay: Option<PathBuf>,

    /// Serialized config model (.json or .toml)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Output file; the document goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file [default: .kcshow.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document title; supports ${version}, ${arch}, ${srcarch}, ${env:NAME}
    #[arg(long)]
    title: Option<String>,

    #[arg(long, env = "KERNELVERSION")]
    kernel_version: Option<String>,

    #[arg(long, env = "ARCH")]
    arch: Option<String>,

    #[arg(long, env = "SRCARCH")]
    srcarch: Option<String>,

    /// Print the JSON Schema of the config model and exit
    #[arg(long)]
    schema: bool,

    /// Print the JSON Schema of the settings file and exit
    #[arg(long)]
    settings_schema: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            overlay: self.overlay.clone(),
            model: self.model.clone(),
            output: self.output.clone(),
            title: self.title.clone(),
            kernel_version: self.kernel_version.clone(),
            arch: self.arch.clone(),
            srcarch: self.srcarch.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if cli.schema {
        println!("{}", serde_json::to_string_pretty(&ConfigTree::json_schema())?);
        return Ok(());
    }
    if cli.settings_schema {
        println!("{}", serde_json::to_string_pretty(&Settings::json_schema())?);
        return Ok(());
    }

    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let ctx = AppContext::load(workdir, cli.config.clone(), cli.overrides()).await?;
    let summary = ctx.run().await?;

    if summary.output.is_some() {
        print_summary(&ctx, &summary);
    }
    Ok(())
}

fn print_summary(ctx: &AppContext, summary: &Summary) {
    let target = summary
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    eprintln!(
        "{} {} ({} items, {} selected, {} bytes) -> {}",
        "Rendered".green().bold(),
        ctx.title.bold(),
        summary.counts.count,
        summary.counts.selected_count,
        summary.bytes,
        target.cyan()
    );
    if let Some(report) = &summary.overlay
        && !report.unknown.is_empty()
    {
        eprintln!(
            "{} {} overlay value(s) matched no symbol",
            "warning:".yellow().bold(),
            report.unknown.len()
        );
    }
}
