mod scanner;

pub use scanner::{ImportKind, classify, scan_imports, strip_comments};

use log::{debug, trace};
use path_clean::clean;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Notification emitted for every specifier the resolver classifies.
///
/// `url(...)` imports are never matched and therefore never produce an event.
/// Already-visited local files are skipped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// Bare-module specifier, exactly as written in the stylesheet
    BareModuleSkipped(String),
    /// Absolute path of a local import that does not exist
    LocalMissing(PathBuf),
    /// Absolute path of a local import that will be watched
    LocalWatched(PathBuf),
}

/// Make a path absolute against the process working directory and normalize it
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    clean(absolute)
}

/// Find every local file transitively imported by `entry`.
///
/// See [`resolve_imports_with`] for ordering and classification rules.
pub fn resolve_imports(entry: &Path) -> Vec<PathBuf> {
    resolve_imports_with(entry, |_| {})
}

/// Find every local file transitively imported by `entry`, reporting each
/// classification to `observer`.
///
/// The result is a pre-order flattening of the import graph: a file comes before
/// the files it imports, siblings keep their textual order, and a file reached a
/// second time (diamond or cycle) is pruned. The entry itself never appears.
///
/// Nothing here fails. A missing entry yields an empty list, a missing import is
/// reported as [`ImportEvent::LocalMissing`] and an unreadable file is treated as
/// having no imports.
///
/// # Example
/// ```no_run
/// use stylewatch::imports::{ImportEvent, resolve_imports_with};
/// use std::path::Path;
///
/// let files = resolve_imports_with(Path::new("src/styles/main.css"), |event| {
///     if let ImportEvent::LocalMissing(path) = event {
///         eprintln!("missing import: {}", path.display());
///     }
/// });
/// println!("{} files to watch", files.len());
/// ```
pub fn resolve_imports_with<F>(entry: &Path, mut observer: F) -> Vec<PathBuf>
where
    F: FnMut(ImportEvent),
{
    let mut visited = FxHashSet::default();
    let entry = absolute_path(entry);
    debug!("Resolving CSS imports from {}", entry.display());

    let imports = walk(&entry, &mut observer, &mut visited);

    debug!("Found {} local imports under {}", imports.len(), entry.display());
    imports
}

fn walk(
    file: &Path,
    observer: &mut dyn FnMut(ImportEvent),
    visited: &mut FxHashSet<PathBuf>,
) -> Vec<PathBuf> {
    if !file.exists() || visited.contains(file) {
        return Vec::new();
    }
    visited.insert(file.to_path_buf());

    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping unreadable stylesheet {}: {}", file.display(), e);
            return Vec::new();
        }
    };

    let containing_dir = file.parent().unwrap_or(Path::new("/"));
    let mut found = Vec::new();

    for specifier in scan_imports(&content) {
        trace!("Classifying import '{}' from {}", specifier, file.display());

        match classify(&specifier, containing_dir) {
            ImportKind::BareModule => {
                trace!("Leaving bare module '{}' to the CSS engine", specifier);
                observer(ImportEvent::BareModuleSkipped(specifier));
            }
            ImportKind::Missing(path) => {
                trace!("Import '{}' not found at {}", specifier, path.display());
                observer(ImportEvent::LocalMissing(path));
            }
            ImportKind::Local(path) => {
                if visited.contains(&path) {
                    trace!("Already visited {}", path.display());
                    continue;
                }
                observer(ImportEvent::LocalWatched(path.clone()));
                found.push(path.clone());
                let nested = walk(&path, observer, visited);
                found.extend(nested);
            }
        }
    }

    found
}
