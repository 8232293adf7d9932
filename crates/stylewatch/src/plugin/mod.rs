mod build;

pub use build::{BuildOutcome, StylesheetBuild};

use crate::host::{BuildHost, ServerOptions};
use crate::imports::{ImportEvent, absolute_path, resolve_imports_with};
use crate::logger::{Diagnostics, LogLogger, Logger};
use crate::transform::Pipeline;
use crate::types::{StylesheetOptions, StylewatchError};
use std::path::PathBuf;
use std::sync::Arc;

/// What a registration set up with the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Absolute entry path, `None` when no entry was configured
    pub entry: Option<PathBuf>,
    /// Absolute output path
    pub output: PathBuf,
    /// Locally imported stylesheets registered as watch targets, in discovery order
    pub imports: Vec<PathBuf>,
    /// Whether the before-build step will compile anything
    pub active: bool,
}

/// Compiles one CSS entry file per build and keeps the host watching its imports
pub struct StylesheetPlugin {
    options: StylesheetOptions,
    logger: Arc<dyn Logger>,
    pipeline: Option<Pipeline>,
}

impl StylesheetPlugin {
    pub fn new(options: StylesheetOptions) -> Self {
        Self { options, logger: Arc::new(LogLogger), pipeline: None }
    }

    /// Send diagnostics to `logger` instead of the `log` facade
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the transform chain built from the options
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn options(&self) -> &StylesheetOptions {
        &self.options
    }

    /// Register watch targets, the before-build step and dev-server options.
    ///
    /// A missing or absent entry is reported and leaves an inert build step behind;
    /// the entry path is still watched so creating it later is picked up.
    pub fn register(&self, host: &mut dyn BuildHost) -> Registration {
        let options = &self.options;
        let diagnostics = Diagnostics::new(Arc::clone(&self.logger), options.debug);
        let dirs = host.directories();

        let output = absolute_path(&dirs.output_root().join(&options.output));
        let entry =
            options.entry.as_ref().map(|entry| absolute_path(&dirs.input_root().join(entry)));

        let valid_entry = match &entry {
            None => {
                diagnostics.error(&StylewatchError::MissingEntry.to_string());
                None
            }
            Some(entry) => {
                let watch = host.watch_path(entry);
                host.add_watch_target(&watch);
                if entry.exists() {
                    Some(entry.clone())
                } else {
                    diagnostics.error(&StylewatchError::EntryNotFound(entry.clone()).to_string());
                    None
                }
            }
        };

        let imports = match &valid_entry {
            Some(entry) if options.watch_imports => {
                let imports = resolve_imports_with(entry, |event| match event {
                    ImportEvent::BareModuleSkipped(specifier) => {
                        diagnostics.debug(&format!("Skipping package import '{specifier}'"));
                    }
                    ImportEvent::LocalMissing(path) => {
                        diagnostics
                            .warn(&format!("Imported stylesheet not found: {}", path.display()));
                    }
                    ImportEvent::LocalWatched(path) => {
                        diagnostics.debug(&format!("Watching import {}", path.display()));
                    }
                });
                for import in &imports {
                    let watch = host.watch_path(import);
                    host.add_watch_target(&watch);
                }
                imports
            }
            _ => Vec::new(),
        };

        let pipeline = self.pipeline.clone().unwrap_or_else(|| Pipeline::for_options(options));
        diagnostics.debug(&format!("Transform stages: {}", pipeline.stage_names().join(" -> ")));

        let active = valid_entry.is_some();
        host.add_before_build(StylesheetBuild::new(
            valid_entry,
            output.clone(),
            pipeline,
            options.source_map,
            diagnostics.clone(),
        ));

        let watch = if options.watch_output { vec![host.watch_path(&output)] } else { Vec::new() };
        host.set_server_options(ServerOptions { watch, dom_diff: options.dom_diff });

        if active {
            diagnostics.debug(&format!(
                "Registered {} -> {} ({} imports watched)",
                entry.as_ref().map(|e| e.display().to_string()).unwrap_or_default(),
                output.display(),
                imports.len()
            ));
        }

        Registration { entry, output, imports, active }
    }
}
