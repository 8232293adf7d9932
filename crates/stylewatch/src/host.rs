use crate::plugin::{BuildOutcome, StylesheetBuild};
use std::path::{Path, PathBuf};

/// Directory roots of a site build.
///
/// `input` and `output` are joined onto `root` when relative. Hosts that allow
/// overriding the output directory must report the overridden value here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directories {
    /// Project working directory
    pub root: PathBuf,
    /// Input (source) root
    pub input: PathBuf,
    /// Output (publish) root
    pub output: PathBuf,
}

impl Directories {
    pub fn new(
        root: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self { root: root.into(), input: input.into(), output: output.into() }
    }

    pub fn input_root(&self) -> PathBuf {
        self.root.join(&self.input)
    }

    pub fn output_root(&self) -> PathBuf {
        self.root.join(&self.output)
    }
}

/// Dev-server settings requested by the plugin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerOptions {
    /// Extra paths the dev server reloads on
    pub watch: Vec<PathBuf>,
    /// Patch the DOM in place instead of reloading the page
    pub dom_diff: bool,
}

/// The site generator the plugin registers with
pub trait BuildHost {
    /// Directory roots as the host resolved them
    fn directories(&self) -> Directories;

    /// Rebuild when this path changes. Called once per path.
    fn add_watch_target(&mut self, path: &Path);

    /// Run `build` before every build cycle
    fn add_before_build(&mut self, build: StylesheetBuild);

    fn set_server_options(&mut self, options: ServerOptions);

    /// Convert an absolute path into the form the host's watcher expects.
    ///
    /// Defaults to a `./`-prefixed path relative to the project root, or the
    /// absolute path when it lives outside the root.
    fn watch_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.directories().root) {
            Ok(relative) => Path::new(".").join(relative),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// In-process host that records registrations and runs builds on demand
#[derive(Default)]
pub struct RecordingHost {
    directories: Directories,
    watch_targets: Vec<PathBuf>,
    builds: Vec<StylesheetBuild>,
    server_options: Option<ServerOptions>,
}

impl RecordingHost {
    pub fn new(directories: Directories) -> Self {
        Self { directories, ..Default::default() }
    }

    pub fn watch_targets(&self) -> &[PathBuf] {
        &self.watch_targets
    }

    pub fn builds(&self) -> &[StylesheetBuild] {
        &self.builds
    }

    pub fn server_options(&self) -> Option<&ServerOptions> {
        self.server_options.as_ref()
    }

    /// Run every registered before-build step once, in registration order
    pub async fn run_builds(&self) -> Vec<BuildOutcome> {
        let mut outcomes = Vec::with_capacity(self.builds.len());
        for build in &self.builds {
            outcomes.push(build.run().await);
        }
        outcomes
    }
}

impl BuildHost for RecordingHost {
    fn directories(&self) -> Directories {
        self.directories.clone()
    }

    fn add_watch_target(&mut self, path: &Path) {
        self.watch_targets.push(path.to_path_buf());
    }

    fn add_before_build(&mut self, build: StylesheetBuild) {
        self.builds.push(build);
    }

    fn set_server_options(&mut self, options: ServerOptions) {
        self.server_options = Some(options);
    }
}
