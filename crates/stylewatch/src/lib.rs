//! Site-generator integration that compiles a CSS entry file once per build and
//! keeps the dev server watching every stylesheet it imports.
//!
//! The heart of the crate is [`imports::resolve_imports`], which walks the
//! `@import` graph of an entry file and returns the local files it depends on.
//! [`StylesheetPlugin`] wires that list into a [`BuildHost`] and registers the
//! compile step.

pub mod cli;
pub mod host;
pub mod imports;
pub mod logger;
pub mod plugin;
pub mod reporter;
pub mod transform;
pub mod types;

pub use host::{BuildHost, Directories, RecordingHost, ServerOptions};
pub use imports::{ImportEvent, resolve_imports, resolve_imports_with};
pub use logger::{CaptureLogger, LogLogger, Logger};
pub use plugin::{BuildOutcome, Registration, StylesheetBuild, StylesheetPlugin};
pub use reporter::ImportReport;
pub use types::{FileConfig, SourceMapMode, StylesheetOptions, StylewatchError};

/// Register a stylesheet plugin with `host`, logging through the `log` facade
///
/// # Example
/// ```no_run
/// use stylewatch::{Directories, RecordingHost, StylesheetOptions, register};
/// use std::path::PathBuf;
///
/// # async fn run() {
/// let mut host = RecordingHost::new(Directories::new(".", "src", "_site"));
/// let options = StylesheetOptions {
///     entry: Some(PathBuf::from("css/main.css")),
///     minify: true,
///     ..Default::default()
/// };
///
/// let registration = register(&mut host, options);
/// println!("Watching {} imports", registration.imports.len());
/// host.run_builds().await;
/// # }
/// ```
pub fn register(host: &mut dyn BuildHost, options: StylesheetOptions) -> Registration {
    StylesheetPlugin::new(options).register(host)
}
