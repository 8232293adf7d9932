use clap::Parser;
use log::debug;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use stylewatch::cli::{BuildArgs, Cli, Command, OutputFormat};
use stylewatch::reporter::{report_json, report_text};
use stylewatch::{
    BuildOutcome, Directories, FileConfig, ImportReport, RecordingHost, StylesheetPlugin,
};

const DEFAULT_OUTPUT_DIR: &str = "_site";

/// Load the config file named on the command line, or the default one in `cwd`
fn load_file_config(cli: &Cli, cwd: &Path) -> Result<FileConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = &cli.config {
        // Use specified config file (error if not found)
        if !config_path.exists() {
            eprintln!("Error: Config file not found: {}", config_path.display());
            std::process::exit(1);
        }
        return Ok(FileConfig::load(config_path)?);
    }

    // Look for default config file in cwd
    match FileConfig::find_default(cwd) {
        Some(path) => match FileConfig::load(&path) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                eprintln!("Warning: {e}");
                Ok(FileConfig::default())
            }
        },
        None => Ok(FileConfig::default()),
    }
}

fn run_imports(
    entry: Option<PathBuf>,
    format: OutputFormat,
    file_config: &FileConfig,
    cwd: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let entry = match entry {
        Some(entry) => cwd.join(entry),
        None => match &file_config.stylesheet.entry {
            Some(entry) => {
                cwd.join(file_config.input_dir.as_deref().unwrap_or(Path::new("."))).join(entry)
            }
            None => {
                eprintln!(
                    "Error: No entry stylesheet specified. Pass one or set `entry` in the config."
                );
                std::process::exit(1);
            }
        },
    };

    if !entry.exists() {
        eprintln!("Error: Entry stylesheet not found: {}", entry.display());
        std::process::exit(1);
    }

    let report = ImportReport::collect(&entry);

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    let mut stdout = BufWriter::new(std::io::stdout());
    match format {
        OutputFormat::Text => report_text(&mut stdout, &report, cwd)?,
        OutputFormat::Json => writeln!(stdout, "{}", report_json(&report)?)?,
    }
    stdout.flush()?;

    // Exit with error code if an import points at nothing
    if !report.missing.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_build(
    args: BuildArgs,
    file_config: FileConfig,
    cwd: &Path,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Merge config: CLI args override file config
    let mut options = file_config.stylesheet;
    if let Some(entry) = args.entry {
        options.entry = Some(entry);
    }
    if let Some(output) = args.output {
        options.output = output;
    }
    if let Some(source_map) = args.source_map {
        options.source_map = source_map;
    }
    options.minify |= args.minify;
    options.debug |= verbose;

    let input = args.input.or(file_config.input_dir).unwrap_or_else(|| PathBuf::from("."));
    let output_dir = args
        .output_dir
        .or(file_config.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    debug!("Input directory: {}, output directory: {}", input.display(), output_dir.display());

    let mut host = RecordingHost::new(Directories::new(cwd, input, output_dir));
    let registration = StylesheetPlugin::new(options).register(&mut host);
    if !registration.active {
        std::process::exit(1);
    }

    let outcomes = host.run_builds().await;
    if outcomes.iter().any(|o| matches!(o, BuildOutcome::Failed(_))) {
        std::process::exit(1);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let cwd = cli.cwd.canonicalize()?;
    let file_config = load_file_config(&cli, &cwd)?;
    debug!("Loaded config: {:?}", file_config);

    match cli.command {
        Command::Imports { entry, format } => run_imports(entry, format, &file_config, &cwd),
        Command::Build(args) => run_build(args, file_config, &cwd, cli.verbose).await,
    }
}
