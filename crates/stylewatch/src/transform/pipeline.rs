use super::{CssTransform, ExternalCommand, Minifier, Passthrough, SourceMapper, TransformContext};
use super::{TransformError, TransformOutput};
use crate::types::{SourceMapMode, StylesheetOptions};
use log::trace;
use std::sync::Arc;

/// Ordered chain of transform stages run once per build
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn CssTransform>>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Build the chain described by the options: the configured command (or a
    /// passthrough) followed by the minifier when enabled. Without minification a
    /// requested source map comes from a non-minifying lightningcss reprint.
    pub fn for_options(options: &StylesheetOptions) -> Self {
        let base: Arc<dyn CssTransform> = match ExternalCommand::from_command(&options.command) {
            Some(command) => Arc::new(command),
            None => Arc::new(Passthrough),
        };
        let mut pipeline = Self::with_base(base, options.minify);
        if !options.minify && options.source_map != SourceMapMode::Off {
            pipeline.push(Arc::new(SourceMapper));
        }
        pipeline
    }

    /// Build a chain around a caller-supplied base stage
    pub fn with_base(base: Arc<dyn CssTransform>, minify: bool) -> Self {
        let mut pipeline = Self::new();
        pipeline.push(base);
        if minify {
            pipeline.push(Arc::new(Minifier::new()));
        }
        pipeline
    }

    /// Append a stage
    pub fn push(&mut self, stage: Arc<dyn CssTransform>) {
        self.stages.push(stage);
    }

    /// Names of all stages, in run order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order.
    ///
    /// The source map of the last stage that produced one is kept, but only while
    /// later stages leave the CSS untouched. A stage that rewrites the CSS without
    /// a map invalidates it.
    pub fn run(
        &self,
        css: &str,
        cx: &TransformContext,
    ) -> Result<TransformOutput, TransformError> {
        let mut current = TransformOutput { css: css.to_string(), map: None };
        let mut cx = cx.clone();
        let file_name = cx.path.file_name().unwrap_or_default().to_string_lossy().into_owned();

        for stage in &self.stages {
            trace!("Running transform stage '{}' on {}", stage.name(), cx.path.display());
            let next = stage.transform(&current.css, &cx)?;
            let rewritten = next.css != current.css;
            let map = match next.map {
                Some(map) => Some(map),
                None if rewritten => None,
                None => current.map,
            };
            if rewritten {
                cx.source_name = format!("{}://{}", stage.name(), file_name);
            }
            current = TransformOutput { css: next.css, map };
        }

        Ok(current)
    }
}
