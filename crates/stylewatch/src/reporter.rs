use crate::imports::{ImportEvent, absolute_path, resolve_imports_with};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Import graph of one entry stylesheet
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub entry: PathBuf,
    /// Local imports in discovery order
    pub imports: Vec<PathBuf>,
    /// Bare-module specifiers left to the CSS engine
    pub bare_modules: Vec<String>,
    /// Local imports that point at nothing
    pub missing: Vec<PathBuf>,
    pub import_count: usize,
}

impl ImportReport {
    /// Resolve the import graph of `entry` and record every classification
    pub fn collect(entry: &Path) -> Self {
        let mut bare_modules = Vec::new();
        let mut missing = Vec::new();

        let imports = resolve_imports_with(entry, |event| match event {
            ImportEvent::BareModuleSkipped(specifier) => bare_modules.push(specifier),
            ImportEvent::LocalMissing(path) => missing.push(path),
            ImportEvent::LocalWatched(_) => {}
        });

        let import_count = imports.len();
        Self { entry: absolute_path(entry), imports, bare_modules, missing, import_count }
    }
}

/// Write a human-readable report, with paths relative to `cwd` where possible
pub fn report_text<W: Write>(out: &mut W, report: &ImportReport, cwd: &Path) -> io::Result<()> {
    let relative = |path: &Path| path.strip_prefix(cwd).unwrap_or(path).display().to_string();

    writeln!(out, "{}", relative(&report.entry))?;
    if report.imports.is_empty() {
        writeln!(out, "  No local imports found.")?;
    }
    for import in &report.imports {
        writeln!(out, "  {}", relative(import))?;
    }

    if !report.bare_modules.is_empty() {
        writeln!(out, "\nPackage imports ({}):", report.bare_modules.len())?;
        for specifier in &report.bare_modules {
            writeln!(out, "  {specifier}")?;
        }
    }

    if !report.missing.is_empty() {
        writeln!(out, "\nMissing imports ({}):", report.missing.len())?;
        for path in &report.missing {
            writeln!(out, "  {}", relative(path))?;
        }
    }

    writeln!(out, "\n{} local imports", report.import_count)
}

pub fn report_json(report: &ImportReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_and_render() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("main.css"),
            "@import \"tailwindcss\";\n@import \"./exists.css\";\n@import \"./missing.css\";\n",
        )
        .unwrap();
        fs::write(dir.path().join("exists.css"), "").unwrap();

        let report = ImportReport::collect(&dir.path().join("main.css"));

        assert_eq!(report.imports, vec![dir.path().join("exists.css")]);
        assert_eq!(report.bare_modules, vec!["tailwindcss"]);
        assert_eq!(report.missing, vec![dir.path().join("missing.css")]);

        let mut out = Vec::new();
        report_text(&mut out, &report, dir.path()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "main.css\n  exists.css\n\nPackage imports (1):\n  tailwindcss\n\nMissing imports (1):\n  missing.css\n\n1 local imports\n"
        );
    }

    #[test]
    fn test_json_report() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.css"), "").unwrap();

        let report = ImportReport::collect(&dir.path().join("main.css"));
        let json: serde_json::Value = serde_json::from_str(&report_json(&report).unwrap()).unwrap();

        assert_eq!(json["importCount"], 0);
        assert!(json["bareModules"].as_array().unwrap().is_empty());
    }
}
