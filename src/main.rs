use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shapeforge::settings::{default_path, SettingsPersistence};
use shapeforge::{init_json_logging, init_logging, replay, ReplayScript};

/// Replay a script of input events through the ShapeForge editor
#[derive(Parser, Debug)]
#[command(name = "shapeforge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (.toml or .json); defaults to the user config directory
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Replay script (JSON)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.json_logs {
        init_json_logging()?;
    } else {
        init_logging()?;
    }

    let settings_path = match args.settings {
        Some(path) => path,
        None => default_path()?,
    };
    let settings = SettingsPersistence::load_or_default(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let script = ReplayScript::load(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let report = replay(settings.editor_config(), &script)?;

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        report.to_json()?
    };
    println!("{}", output);
    Ok(())
}
