//! Node Model CLI
//!
//! Usage:
//!   node-inspect [OPTIONS] <FILE>
//!
//! Options:
//!   -t, --theme <FILE>     Theme file for default styles (TOML format)
//!   -r, --rotate <DEG>     Rotate the node (degrees, clockwise)
//!   --move <DX,DY>         Move by a delta, axis by axis
//!   --move-to <X,Y>        Move the center to a point
//!   --resize <W,H>         Resize the node
//!   -a, --anchors          Also print anchors, bounds and transform
//!   -h, --help             Print help

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use node_model::{load_node, GraphContext, ResizeInfo, Theme};

#[derive(Parser)]
#[command(name = "node-inspect")]
#[command(about = "Load a diagram node record, apply edits and print its snapshot")]
struct Cli {
    /// Node record (.json or .toml)
    input: PathBuf,

    /// Theme file for default styles (TOML format)
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Rotation in degrees, clockwise positive
    #[arg(short, long, allow_hyphen_values = true)]
    rotate: Option<f64>,

    /// Move by DX,DY
    #[arg(long = "move", value_parser = parse_pair, allow_hyphen_values = true)]
    move_by: Option<(f64, f64)>,

    /// Move the center to X,Y
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    move_to: Option<(f64, f64)>,

    /// Resize to W,H
    #[arg(long, value_parser = parse_pair)]
    resize: Option<(f64, f64)>,

    /// Print anchors, bounds and transform alongside the snapshot
    #[arg(short, long)]
    anchors: bool,
}

fn parse_pair(raw: &str) -> Result<(f64, f64), String> {
    let (a, b) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated numbers, got '{}'", raw))?;
    let a = a.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let b = b.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((a, b))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let theme = match &cli.theme {
        Some(path) => match Theme::from_file(path) {
            Ok(theme) => theme,
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Theme::default(),
    };
    let ctx = GraphContext::new().with_theme(theme).shared();

    let mut node = match load_node(&cli.input, ctx) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("Error reading node '{}': {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(degrees) = cli.rotate {
        node.set_rotate(degrees);
    }
    if let Some((dx, dy)) = cli.move_by {
        node.move_by(dx, dy, false);
    }
    if let Some((x, y)) = cli.move_to {
        node.move_to(x, y, false);
    }
    if let Some((width, height)) = cli.resize {
        node.resize(ResizeInfo::new(width, height));
    }

    let mut output = node.snapshot().to_json_value();
    if cli.anchors {
        output = json!({
            "node": output,
            "anchors": node.anchors(),
            "bounds": node.bounds(),
            "transform": node.transform().css,
            "style": node.node_style(),
        });
    }

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
