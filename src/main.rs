//! `mathgrid` - inspect, verify and normalize diagram save files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mathgrid::document::{load_from_path_with, save_to_path};
use mathgrid::{DiagramGraph, EditorSettings};

/// Command-line tools for math diagram save files
#[derive(Parser, Debug)]
#[command(name = "mathgrid", author, version, about, long_about = None)]
struct Args {
    /// Path to a settings file (JSON); defaults to the user config dir
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (off, error, warn, info, debug, trace or a full directive)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the blocks and connections of a save file
    Inspect { file: PathBuf },
    /// Load a save file and verify every invariant
    Check { file: PathBuf },
    /// Load a save file and write it back in canonical form
    Normalize {
        input: PathBuf,
        /// Output path; defaults to rewriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "mathgrid=info,warn".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<EditorSettings> {
    match config {
        Some(path) => EditorSettings::try_load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(EditorSettings::load()),
    }
}

fn load(path: &Path, settings: EditorSettings) -> Result<DiagramGraph> {
    load_from_path_with(path, settings).with_context(|| format!("failed to load {}", path.display()))
}

fn inspect(graph: &DiagramGraph) {
    println!(
        "{} blocks, {} connections, next number {}",
        graph.block_count(),
        graph.connection_count(),
        graph.block_counter()
    );
    for block in graph.blocks() {
        let free_inputs = block.inputs().iter().filter(|c| !c.occupied).count();
        println!(
            "  block {:>3} {:<14} {} at ({}, {})  inputs {}/{} free  \"{}\"",
            block.number,
            block.kind.name(),
            block.symbol(),
            block.position.x,
            block.position.y,
            free_inputs,
            block.inputs().len(),
            block.label.text
        );
    }
    for conn in graph.connections() {
        let number = |id| graph.block(id).map(|b| b.number).unwrap_or_default();
        println!(
            "  wire  {:>3} -> {:>3} input{}  verticalX {}",
            number(conn.source),
            number(conn.target),
            conn.input_slot + 1,
            conn.vertical_x
        );
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Inspect { file } => {
            let graph = load(&file, settings)?;
            inspect(&graph);
        }
        Command::Check { file } => match load_from_path_with(&file, settings) {
            Ok(graph) => {
                println!(
                    "ok: {} blocks, {} connections",
                    graph.block_count(),
                    graph.connection_count()
                );
            }
            Err(e) => {
                error!(path = %file.display(), "Check failed: {}", e);
                println!("invalid: {e}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Normalize { input, output } => {
            let graph = load(&input, settings)?;
            let target = output.unwrap_or_else(|| input.clone());
            save_to_path(&graph, &target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(from = %input.display(), to = %target.display(), "Normalized");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
