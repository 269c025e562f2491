mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::Path;

use revim::action::KEYMAP;
use revim::config;
use revim::registry::{cursor_seed, parse_embedded_data};

use crate::cli::{Cli, Command};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Keymap => print_keymap(),
        Command::Config => print_config(),
        Command::Inspect { file } => inspect(&file)?,
    }

    Ok(())
}

fn print_keymap() {
    println!("{:<8} description", "key");
    println!("{:<8} repeat count for j/k (e.g. 5j)", "1-9");
    for (key, _, description) in KEYMAP {
        println!("{key:<8} {description}");
    }
}

fn print_config() {
    let path = config::config_path();
    let config = config::load_config();
    let state = if path.exists() { "" } else { " (not found, defaults)" };

    println!("config file: {}{state}", path.display());
    println!("count_timeout_ms = {}", config.count_timeout.as_millis());
    println!(
        "ready_poll_interval_ms = {}",
        config.ready_poll_interval.as_millis()
    );
    println!("ready_poll_attempts = {}", config.ready_poll_attempts);
    println!("scroll_margin_top = {}", config.scroll_margins.top);
    println!("scroll_margin_bottom = {}", config.scroll_margins.bottom);
    println!(
        "navigation_events = [{}]",
        config
            .navigation_events
            .iter()
            .map(|e| format!("{e:?}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn inspect(file: &Path) -> Result<()> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?
    };

    let Some(diffs) = parse_embedded_data(&raw) else {
        bail!("not a diff data blob (expected payload.diffSummaries)");
    };
    let seed = cursor_seed(&diffs);

    for (i, diff) in diffs.iter().enumerate() {
        let marker = if Some(i) == seed { ">" } else { " " };
        let viewed = if diff.marked_as_viewed { "viewed" } else { "unviewed" };
        println!("{marker} {i:>4}  {viewed:<8}  {}", diff.id);
    }
    println!(
        "{} diffs, {} unviewed",
        diffs.len(),
        diffs.iter().filter(|d| !d.marked_as_viewed).count()
    );

    Ok(())
}
