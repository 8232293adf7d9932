mod command;
mod minify;
mod pipeline;

pub use command::ExternalCommand;
pub use minify::{Minifier, SourceMapper};
pub use pipeline::Pipeline;

use std::path::PathBuf;
use thiserror::Error;

/// Error types for transform stages
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{program}` failed ({status}): {stderr}")]
    CommandFailed { program: String, status: String, stderr: String },

    #[error("CSS parse error: {0}")]
    Parse(String),

    #[error("Minification failed: {0}")]
    Minify(String),

    #[error("CSS printing failed: {0}")]
    Print(String),

    #[error("Source map error: {0}")]
    SourceMap(String),
}

/// What a stage knows about the stylesheet it is transforming
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Absolute path of the entry stylesheet
    pub path: PathBuf,

    /// Whether stages that can emit a source map should do so
    pub source_map: bool,

    /// Name recorded for the input in source maps. The entry path until a stage
    /// rewrites the CSS, then `<stage>://<file name>`.
    pub source_name: String,
}

impl TransformContext {
    pub fn new(path: PathBuf, source_map: bool) -> Self {
        let source_name = path.to_string_lossy().into_owned();
        Self { path, source_map, source_name }
    }
}

/// Result of one transform stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    pub css: String,

    /// Source map as JSON, if the stage produced one
    pub map: Option<String>,
}

/// A stage of the CSS transformation chain
pub trait CssTransform: Send + Sync {
    /// Stage identifier used in diagnostics (e.g. "minify")
    fn name(&self) -> &str;

    /// Transform `css`, which is the entry file's text or the previous stage's output
    fn transform(&self, css: &str, cx: &TransformContext)
        -> Result<TransformOutput, TransformError>;
}

/// Copies the source through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl CssTransform for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn transform(
        &self,
        css: &str,
        _cx: &TransformContext,
    ) -> Result<TransformOutput, TransformError> {
        Ok(TransformOutput { css: css.to_string(), map: None })
    }
}
