use crate::transform::TransformError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name of the compiled stylesheet, relative to the output root
pub const DEFAULT_OUTPUT: &str = "styles.css";

/// Config file names looked up in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["stylewatch.json", "stylewatch.jsonc"];

/// How the compiled stylesheet references its source map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    #[default]
    Off,
    /// Written next to the output as `<output>.map`
    External,
    /// Embedded in the output as a data URL
    Inline,
}

/// Options for compiling and watching one CSS entry file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylesheetOptions {
    /// Entry stylesheet, relative to the host's input directory
    pub entry: Option<PathBuf>,

    /// Compiled file name, relative to the host's output directory
    pub output: PathBuf,

    /// Run the minifier after the base transform
    pub minify: bool,

    /// Ask the dev server to watch the compiled output
    pub watch_output: bool,

    /// Register every locally imported stylesheet as a watch target
    pub watch_imports: bool,

    /// Let the dev server patch the DOM instead of reloading. Turning this off
    /// avoids flashes of unstyled content on some setups.
    pub dom_diff: bool,

    /// Emit debug diagnostics
    pub debug: bool,

    pub source_map: SourceMapMode,

    /// Program and arguments of the base transform (e.g. a Tailwind CLI reading
    /// stdin and writing stdout). Empty copies the source through unchanged.
    pub command: Vec<String>,
}

impl Default for StylesheetOptions {
    fn default() -> Self {
        Self {
            entry: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            minify: false,
            watch_output: true,
            watch_imports: true,
            dom_diff: true,
            debug: false,
            source_map: SourceMapMode::Off,
            command: Vec::new(),
        }
    }
}

/// Error types for stylewatch operations
#[derive(Error, Debug)]
pub enum StylewatchError {
    #[error("No entry stylesheet configured")]
    MissingEntry,

    #[error("Entry stylesheet not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Build task panicked: {0}")]
    TaskPanicked(String),

    #[error("Invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

/// Config file structure for stylewatch.json / stylewatch.jsonc
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Input root of the site, relative to the working directory
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Output root of the site, relative to the working directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(flatten)]
    pub stylesheet: StylesheetOptions,
}

impl FileConfig {
    /// Load config from file path, supporting .json and .jsonc
    pub fn load(path: &Path) -> Result<Self, StylewatchError> {
        let invalid =
            |message: String| StylewatchError::Config { path: path.to_path_buf(), message };

        let mut content = fs::read_to_string(path)?;
        json_strip_comments::strip(&mut content).map_err(|e| invalid(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    /// Find default config file in directory
    pub fn find_default(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = StylesheetOptions::default();

        assert_eq!(options.entry, None);
        assert_eq!(options.output, PathBuf::from("styles.css"));
        assert!(!options.minify);
        assert!(options.watch_output);
        assert!(options.watch_imports);
        assert!(options.dom_diff);
        assert!(!options.debug);
        assert_eq!(options.source_map, SourceMapMode::Off);
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: StylesheetOptions =
            serde_json::from_str(r#"{ "entry": "css/main.css", "minify": true }"#).unwrap();

        assert_eq!(options.entry, Some(PathBuf::from("css/main.css")));
        assert!(options.minify);
        assert!(options.watch_imports);
        assert_eq!(options.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_load_jsonc_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stylewatch.jsonc");
        fs::write(
            &path,
            r#"{
  // site layout
  "inputDir": "src",
  "outputDir": "_site",
  "entry": "css/main.css",
  "output": "assets/site.css",
  "domDiff": false, // avoids unstyled flashes
  "sourceMap": "external",
  "command": ["tailwindcss", "--input", "-"]
}"#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();

        assert_eq!(config.input_dir, Some(PathBuf::from("src")));
        assert_eq!(config.output_dir, Some(PathBuf::from("_site")));
        assert_eq!(config.stylesheet.entry, Some(PathBuf::from("css/main.css")));
        assert_eq!(config.stylesheet.output, PathBuf::from("assets/site.css"));
        assert!(!config.stylesheet.dom_diff);
        assert!(config.stylesheet.watch_output);
        assert_eq!(config.stylesheet.source_map, SourceMapMode::External);
        assert_eq!(config.stylesheet.command, vec!["tailwindcss", "--input", "-"]);
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stylewatch.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileConfig::load(&path).unwrap_err();

        assert!(matches!(err, StylewatchError::Config { .. }));
    }

    #[test]
    fn test_find_default_config() {
        let dir = tempdir().unwrap();
        assert_eq!(FileConfig::find_default(dir.path()), None);

        fs::write(dir.path().join("stylewatch.jsonc"), "{}").unwrap();
        assert_eq!(
            FileConfig::find_default(dir.path()),
            Some(dir.path().join("stylewatch.jsonc"))
        );

        fs::write(dir.path().join("stylewatch.json"), "{}").unwrap();
        assert_eq!(
            FileConfig::find_default(dir.path()),
            Some(dir.path().join("stylewatch.json"))
        );
    }
}
