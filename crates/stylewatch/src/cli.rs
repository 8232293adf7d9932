use crate::types::SourceMapMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stylewatch")]
#[command(about = "Compile a site's CSS entry file and list the stylesheets it imports")]
pub struct Cli {
    /// Path to config file (stylewatch.json or stylewatch.jsonc)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub cwd: PathBuf,

    /// Print debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the local stylesheets an entry file imports
    Imports {
        /// Entry stylesheet (defaults to the configured entry)
        entry: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compile the entry stylesheet once
    Build(BuildArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Entry stylesheet, relative to the input directory
    #[arg(short, long)]
    pub entry: Option<PathBuf>,

    /// Input directory [default: .]
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output directory [default: _site]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Compiled file name, relative to the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minify the compiled CSS
    #[arg(long)]
    pub minify: bool,

    /// Source map mode
    #[arg(long)]
    pub source_map: Option<SourceMapMode>,
}

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
