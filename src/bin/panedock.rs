use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use panedock::common::config::{Config, config_file};
use panedock::common::log;
use panedock::layout_engine::{DropPosition, LayoutEngine, LayoutTree, PaneKind};
use tracing::info;

#[derive(Parser)]
#[command(about = "Inspect and edit dockable panel layouts")]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Layout document to operate on (overrides the configured one).
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a layout holding a single pane.
    Init {
        /// Kind of the initial pane.
        #[arg(long, default_value = "graph")]
        kind: String,
        /// Overwrite an existing layout.
        #[arg(long)]
        force: bool,
    },
    /// Print the layout tree.
    Show,
    /// Check the configuration and the layout for problems.
    Check,
    /// Add a new pane next to a target.
    Add {
        kind: String,
        #[arg(long)]
        target: String,
        #[arg(long, default_value = "center")]
        position: DropPosition,
    },
    /// Remove a pane or container and everything under it.
    Remove { id: String },
    /// Move a pane or container next to a target.
    Move {
        source: String,
        #[arg(long)]
        target: String,
        #[arg(long, default_value = "center")]
        position: DropPosition,
    },
}

fn main() {
    let opt = Cli::parse();
    log::init_logging();

    if let Err(err) = run(opt) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(opt: Cli) -> anyhow::Result<()> {
    let config_path = opt.config.clone().unwrap_or_else(config_file);
    let config = if config_path.exists() {
        Config::read(&config_path)
            .with_context(|| format!("reading config {}", config_path.display()))?
    } else {
        Config::default()
    };
    let layout_path = opt.layout.clone().unwrap_or_else(|| config.storage.layout_path());
    let engine = LayoutEngine::new(config.layout.clone());

    match opt.command {
        Commands::Init { kind, force } => {
            if layout_path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", layout_path.display());
            }
            let kind = PaneKind::from(kind);
            if kind.is_reserved() {
                bail!("{kind} is not a pane kind");
            }
            let layout = LayoutTree::single(kind);
            store(&layout, &layout_path)?;
            print!("{}", layout.draw_tree());
        }
        Commands::Show => print!("{}", open(&layout_path)?.draw_tree()),
        Commands::Check => {
            let mut issues = config.validate();
            match LayoutTree::load(&layout_path) {
                Ok(layout) => issues.extend(layout.validate()),
                Err(err) => issues.push(format!("{}: {err:#}", layout_path.display())),
            }
            if !issues.is_empty() {
                for issue in &issues {
                    eprintln!("{issue}");
                }
                bail!("{} problem(s) found", issues.len());
            }
            println!("Layout and config validation passed");
        }
        Commands::Add { kind, target, position } => {
            let layout = open(&layout_path)?;
            let next = engine.try_insert_pane(&layout, &target, PaneKind::from(kind), position)?;
            store(&next, &layout_path)?;
            print!("{}", next.draw_tree());
        }
        Commands::Remove { id } => {
            let layout = open(&layout_path)?;
            let next = engine.try_remove_pane(&layout, &id)?;
            store(&next, &layout_path)?;
            print!("{}", next.draw_tree());
        }
        Commands::Move { source, target, position } => {
            let layout = open(&layout_path)?;
            let next = engine.try_move_pane(&layout, &source, &target, position)?;
            store(&next, &layout_path)?;
            print!("{}", next.draw_tree());
        }
    }
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<LayoutTree> {
    LayoutTree::load(path).with_context(|| format!("loading layout {}", path.display()))
}

fn store(layout: &LayoutTree, path: &Path) -> anyhow::Result<()> {
    layout.save(path).with_context(|| format!("saving layout {}", path.display()))?;
    info!(path = %path.display(), nodes = layout.len(), "layout saved");
    Ok(())
}
