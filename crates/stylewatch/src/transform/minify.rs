use super::{CssTransform, TransformContext, TransformError, TransformOutput};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;

/// Minifies CSS with lightningcss, optionally emitting a source map
#[derive(Debug, Default, Clone, Copy)]
pub struct Minifier;

impl Minifier {
    pub fn new() -> Self {
        Self
    }
}

impl CssTransform for Minifier {
    fn name(&self) -> &str {
        "minify"
    }

    fn transform(
        &self,
        css: &str,
        cx: &TransformContext,
    ) -> Result<TransformOutput, TransformError> {
        print_stylesheet(css, cx, true)
    }
}

/// Reprints CSS through lightningcss without minifying, so stages that cannot
/// map their output still get a source map
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceMapper;

impl CssTransform for SourceMapper {
    fn name(&self) -> &str {
        "source-map"
    }

    fn transform(
        &self,
        css: &str,
        cx: &TransformContext,
    ) -> Result<TransformOutput, TransformError> {
        print_stylesheet(css, cx, false)
    }
}

fn print_stylesheet(
    css: &str,
    cx: &TransformContext,
    minify: bool,
) -> Result<TransformOutput, TransformError> {
    let options = ParserOptions { filename: cx.source_name.clone(), ..ParserOptions::default() };

    let mut stylesheet =
        StyleSheet::parse(css, options).map_err(|e| TransformError::Parse(e.to_string()))?;

    if minify {
        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| TransformError::Minify(e.to_string()))?;
    }

    let mut source_map = if cx.source_map {
        let mut map = SourceMap::new("/");
        let index = map.add_source(&cx.source_name);
        map.set_source_content(index as usize, css)
            .map_err(|e| TransformError::SourceMap(format!("{e:?}")))?;
        Some(map)
    } else {
        None
    };

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify,
            source_map: source_map.as_mut(),
            ..PrinterOptions::default()
        })
        .map_err(|e| TransformError::Print(e.to_string()))?;

    let map = match source_map.as_mut() {
        Some(map) => {
            Some(map.to_json(None).map_err(|e| TransformError::SourceMap(format!("{e:?}")))?)
        }
        None => None,
    };

    Ok(TransformOutput { css: printed.code, map })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context(source_map: bool) -> TransformContext {
        TransformContext::new(PathBuf::from("/site/css/main.css"), source_map)
    }

    #[test]
    fn test_minifies_whitespace() {
        let css = r#"
.button {
    color: red;
    margin: 0px;
}
"#;

        let output = Minifier::new().transform(css, &context(false)).unwrap();

        assert!(output.css.len() < css.len());
        assert!(!output.css.contains('\n'));
        assert!(output.css.contains(".button{"));
        assert_eq!(output.map, None);
    }

    #[test]
    fn test_emits_source_map_when_asked() {
        let output = Minifier::new().transform(".a { color: blue; }", &context(true)).unwrap();

        let map: serde_json::Value = serde_json::from_str(output.map.as_deref().unwrap()).unwrap();
        assert_eq!(map["version"], 3);
        assert!(map["mappings"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn test_source_mapper_keeps_formatting_readable() {
        let output = SourceMapper.transform(".a{color:blue}", &context(true)).unwrap();

        assert!(output.css.contains('\n'));
        assert!(output.css.contains("color: #00f") || output.css.contains("color: blue"));
        let map: serde_json::Value = serde_json::from_str(output.map.as_deref().unwrap()).unwrap();
        assert!(map["sources"][0].as_str().is_some_and(|s| s.ends_with("main.css")));
    }

    #[test]
    fn test_map_names_rewritten_source() {
        let mut cx = context(true);
        cx.source_name = "tailwindcss://main.css".to_string();

        let output = Minifier::new().transform(".a { color: blue; }", &cx).unwrap();

        let map: serde_json::Value = serde_json::from_str(output.map.as_deref().unwrap()).unwrap();
        assert!(map["sources"][0].as_str().is_some_and(|s| s.contains("tailwindcss")));
    }
}
