use crate::logger::Diagnostics;
use crate::transform::{Pipeline, TransformContext, TransformOutput};
use crate::types::{SourceMapMode, StylewatchError};
use base64::Engine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

/// Result of one run of the before-build step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No valid entry; nothing was done
    Skipped,
    /// Compiled CSS was written
    Written { path: PathBuf, bytes: usize },
    /// The build failed and was reported; the previous output (if any) is untouched
    Failed(String),
}

struct BuildPlan {
    entry: Option<PathBuf>,
    output: PathBuf,
    pipeline: Pipeline,
    source_map: SourceMapMode,
    diagnostics: Diagnostics,
}

/// The compile-and-write step registered with the host.
///
/// Cheap to clone; the host calls [`StylesheetBuild::run`] once per build cycle.
#[derive(Clone)]
pub struct StylesheetBuild {
    plan: Arc<BuildPlan>,
}

impl StylesheetBuild {
    pub(crate) fn new(
        entry: Option<PathBuf>,
        output: PathBuf,
        pipeline: Pipeline,
        source_map: SourceMapMode,
        diagnostics: Diagnostics,
    ) -> Self {
        Self { plan: Arc::new(BuildPlan { entry, output, pipeline, source_map, diagnostics }) }
    }

    /// Entry stylesheet, `None` when the build is inert
    pub fn entry(&self) -> Option<&Path> {
        self.plan.entry.as_deref()
    }

    pub fn output(&self) -> &Path {
        &self.plan.output
    }

    /// Compile the entry and write the output. Never fails: every error is
    /// reported through the logger and returned as [`BuildOutcome::Failed`].
    pub async fn run(&self) -> BuildOutcome {
        let plan = &self.plan;
        let Some(entry) = plan.entry.as_deref() else {
            plan.diagnostics.debug("Skipping stylesheet build: no valid entry");
            return BuildOutcome::Skipped;
        };

        let start = Instant::now();
        match self.compile(entry).await {
            Ok(bytes) => {
                plan.diagnostics.info(&format!(
                    "Wrote {} ({} bytes) in {}ms",
                    plan.output.display(),
                    bytes,
                    start.elapsed().as_millis()
                ));
                BuildOutcome::Written { path: plan.output.clone(), bytes }
            }
            Err(e) => {
                plan.diagnostics.error(&format!("Failed to build {}: {}", entry.display(), e));
                BuildOutcome::Failed(e.to_string())
            }
        }
    }

    async fn compile(&self, entry: &Path) -> Result<usize, StylewatchError> {
        let plan = &self.plan;
        let source = fs::read_to_string(entry).await?;

        let pipeline = plan.pipeline.clone();
        let cx = TransformContext::new(entry.to_path_buf(), plan.source_map != SourceMapMode::Off);

        // Run CPU-bound work in blocking thread pool
        let output = tokio::task::spawn_blocking(move || pipeline.run(&source, &cx))
            .await
            .map_err(|e| StylewatchError::TaskPanicked(e.to_string()))??;

        if let Some(parent) = plan.output.parent() {
            fs::create_dir_all(parent).await?;
        }

        let (css, external_map) = self.attach_source_map(output);
        fs::write(&plan.output, css.as_bytes()).await?;
        // Map last: a failed CSS write must not leave a fresh map beside stale output
        if let Some((map_path, map)) = external_map {
            fs::write(&map_path, map.as_bytes()).await?;
        }
        Ok(css.len())
    }

    /// Append the `sourceMappingURL` comment. Returns the final CSS and, in
    /// external mode, the map file still to be written.
    fn attach_source_map(&self, output: TransformOutput) -> (String, Option<(PathBuf, String)>) {
        let plan = &self.plan;
        let TransformOutput { mut css, map } = output;

        let map = match (plan.source_map, map) {
            (SourceMapMode::Off, _) => return (css, None),
            (_, None) => {
                plan.diagnostics.warn("Source map requested but no transform stage produced one");
                return (css, None);
            }
            (_, Some(map)) => map,
        };

        if !css.ends_with('\n') {
            css.push('\n');
        }

        match plan.source_map {
            SourceMapMode::External => {
                let map_path = map_path_for(&plan.output);
                let name = map_path.file_name().unwrap_or_default().to_string_lossy();
                css.push_str(&format!("/*# sourceMappingURL={name} */\n"));
                (css, Some((map_path, map)))
            }
            SourceMapMode::Inline => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(map.as_bytes());
                css.push_str(&format!(
                    "/*# sourceMappingURL=data:application/json;base64,{encoded} */\n"
                ));
                (css, None)
            }
            SourceMapMode::Off => (css, None),
        }
    }
}

/// `styles.css` -> `styles.css.map`
fn map_path_for(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".map");
    PathBuf::from(path)
}
