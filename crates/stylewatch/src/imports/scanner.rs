use path_clean::clean;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// How a single `@import` specifier is handled by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// No extension in the final segment; left to the CSS engine's module resolution
    BareModule,
    /// Local reference whose resolved path does not exist
    Missing(PathBuf),
    /// Local reference that exists on disk
    Local(PathBuf),
}

/// Get the compiled regex for block comments (compiled once, cached)
fn block_comment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Shortest span between a `/*` and the next `*/`, across lines
    REGEX.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").unwrap())
}

/// Get the compiled regex for CSS imports (compiled once, cached)
fn css_import_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // Matches @import with a quoted string. The literal must directly follow the
        // whitespace, so `@import url("...")` and `@import url(...)` never match.
        // Examples:
        //   @import "tailwindcss";
        //   @import './components/button.css';
        Regex::new(r#"@import\s+["']([^"']+)["']"#).unwrap()
    })
}

/// Remove every `/* ... */` block comment from `source`.
///
/// A `/*` with no closing `*/` drops the rest of the text, imports included.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for comment in block_comment_regex().find_iter(source) {
        out.push_str(&source[last..comment.start()]);
        last = comment.end();
    }

    let rest = &source[last..];
    match rest.find("/*") {
        Some(open) => out.push_str(&rest[..open]),
        None => out.push_str(rest),
    }

    out
}

/// Extract raw `@import` specifiers in the order they appear, ignoring commented-out
/// statements and `url(...)` imports
pub fn scan_imports(source: &str) -> Vec<String> {
    let stripped = strip_comments(source);
    css_import_regex().captures_iter(&stripped).map(|cap| cap[1].to_string()).collect()
}

/// Whether the final path segment of a specifier carries a file extension
fn has_extension(specifier: &str) -> bool {
    let last_segment = specifier.rsplit(['/', '\\']).next().unwrap_or(specifier);
    last_segment != "." && last_segment != ".." && last_segment.contains('.')
}

/// Classify a specifier found in a file living in `containing_dir`
pub fn classify(specifier: &str, containing_dir: &Path) -> ImportKind {
    if !has_extension(specifier) {
        return ImportKind::BareModule;
    }

    let resolved = clean(containing_dir.join(specifier));
    if resolved.exists() {
        ImportKind::Local(resolved)
    } else {
        ImportKind::Missing(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_double_and_single_quotes() {
        let content = r#"
@import "./base.css";
@import './theme.css';
@import "tailwindcss";
"#;

        let imports = scan_imports(content);

        assert_eq!(imports, vec!["./base.css", "./theme.css", "tailwindcss"]);
    }

    #[test]
    fn test_scan_skips_url_imports() {
        let content = r#"
@import url("https://fonts.example/a.css");
@import url('https://fonts.example/b.css');
@import url(https://fonts.example/c.css);
@import "./local.css";
"#;

        let imports = scan_imports(content);

        assert_eq!(imports, vec!["./local.css"]);
    }

    #[test]
    fn test_scan_requires_whitespace() {
        assert!(scan_imports(r#"@import"./tight.css";"#).is_empty());
        assert_eq!(scan_imports("@import\n\t'./spaced.css'"), vec!["./spaced.css"]);
    }

    #[test]
    fn test_scan_without_semicolon() {
        assert_eq!(scan_imports(r#"@import "./a.css""#), vec!["./a.css"]);
    }

    #[test]
    fn test_scan_no_imports() {
        let content = r#"
.button {
    color: red;
}
"#;
        assert!(scan_imports(content).is_empty());
        assert!(scan_imports("").is_empty());
    }

    #[test]
    fn test_scan_ignores_single_line_comment() {
        let content = r#"
/* @import "./commented.css"; */
@import "./real.css";
"#;

        assert_eq!(scan_imports(content), vec!["./real.css"]);
    }

    #[test]
    fn test_scan_ignores_multi_line_comment() {
        let content = r#"
/*
  @import "./old.css";
  @import "./older.css";
*/
"#;

        assert!(scan_imports(content).is_empty());
    }

    #[test]
    fn test_strip_comments_is_non_greedy() {
        let content = r#"/* one */ @import "./kept.css"; /* two */"#;

        assert_eq!(strip_comments(content), r#" @import "./kept.css"; "#);
        assert_eq!(scan_imports(content), vec!["./kept.css"]);
    }

    #[test]
    fn test_unterminated_comment_drops_rest() {
        let content = r#"
@import "./before.css";
/* never closed
@import "./after.css";
"#;

        assert_eq!(scan_imports(content), vec!["./before.css"]);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("./x.css"));
        assert!(has_extension("x.css"));
        assert!(has_extension("../y.css"));
        assert!(has_extension("pkg/dist/theme.css"));
        assert!(!has_extension("tailwindcss"));
        assert!(!has_extension("open-props/normalize"));
        assert!(!has_extension("@scope/pkg"));
        assert!(!has_extension("./styles.d/base"));
        assert!(!has_extension(".."));
    }

    #[test]
    fn test_classify() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("exists.css"), "").unwrap();

        assert_eq!(classify("tailwindcss", dir.path()), ImportKind::BareModule);
        assert_eq!(
            classify("./exists.css", dir.path()),
            ImportKind::Local(dir.path().join("exists.css"))
        );
        assert_eq!(
            classify("./missing.css", dir.path()),
            ImportKind::Missing(dir.path().join("missing.css"))
        );
    }

    #[test]
    fn test_classify_normalizes_parent_segments() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("components")).unwrap();
        fs::write(dir.path().join("base.css"), "").unwrap();

        let kind = classify("../base.css", &dir.path().join("components"));

        assert_eq!(kind, ImportKind::Local(dir.path().join("base.css")));
    }
}
