use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config TOML (written with commented defaults when missing)
    #[arg(long, global = true, default_value = "facechoir.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay a recorded face session (JSON lines) into a WAV file
    Render(RenderArgs),
    /// Render a seeded synthetic face stream into a WAV file
    Demo(DemoArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PatchArgs {
    /// Patch JSON file
    #[arg(long)]
    pub patch: Option<PathBuf>,

    /// Override the patch voice count
    #[arg(long)]
    pub voices: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Session file, one {"t": seconds, "sample": {...}} object per line
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Output WAV path
    #[arg(long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub patch: PatchArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Length of the rendering in seconds
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f64,

    /// Output WAV path
    #[arg(long)]
    pub out: PathBuf,

    /// Seed for the synthetic face stream
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    #[command(flatten)]
    pub patch: PatchArgs,
}
