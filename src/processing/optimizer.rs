use tracing::debug;

use crate::core::{Dimensions, OptimizedSvg, Settings};
use crate::processing::plugins::{PluginParams, PluginRegistry};
use crate::processing::svg::{Document, WriteOptions, parse_document, traverse, write_document};
use crate::processing::transform::{
    DimensionsExtractor, Resize, ResizeOptions, TrimWhitespace, extract_dimensions,
};
use crate::utils::OptimizerResult;

/// Upper bound on plugin passes when `multipass` is set.
const MAX_PASSES: usize = 10;

/// Runs the two-pass optimization pipeline.
///
/// The first pass runs the enabled plugins in settings order. The second
/// re-parses that output, applies the trim and resize transforms when they
/// are configured, and reads the final dimensions. Holds no per-request state.
pub struct SvgOptimizer {
    registry: PluginRegistry,
}

impl SvgOptimizer {
    pub fn new() -> Self {
        Self::with_registry(PluginRegistry::with_builtins())
    }

    pub fn with_registry(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    /// Reads the dimensions of an unmodified document.
    pub fn wrap_original(&self, data: &str) -> OptimizerResult<Dimensions> {
        let doc = parse_document(data)?;
        Ok(extract_dimensions(&doc))
    }

    /// Optimizes `data` with `settings`.
    pub fn optimize(&self, data: &str, settings: &Settings) -> OptimizerResult<OptimizedSvg> {
        let write = WriteOptions::pretty(settings.pretty);

        let output = self.plugin_pass(data, settings, write)?;
        self.transform_pass(&output, settings, write)
    }

    fn plugin_pass(&self, data: &str, settings: &Settings, write: WriteOptions) -> OptimizerResult<String> {
        let mut doc = parse_document(data)?;
        self.run_plugins(&mut doc, settings)?;
        let mut output = write_document(&doc, write)?;

        if settings.multipass {
            for pass in 2..=MAX_PASSES {
                self.run_plugins(&mut doc, settings)?;
                let next = write_document(&doc, write)?;
                debug!("Pass {} produced {} bytes (was {})", pass, next.len(), output.len());
                if next.len() >= output.len() {
                    break;
                }
                output = next;
            }
        }

        Ok(output)
    }

    fn run_plugins(&self, doc: &mut Document, settings: &Settings) -> OptimizerResult<()> {
        for name in settings.plugins.enabled() {
            // cleanupNumericValues never runs with precision 0.
            let float_precision = if name == "cleanupNumericValues" && settings.float_precision == 0 {
                1
            } else {
                settings.float_precision
            };
            let params = PluginParams {
                float_precision,
                transform_precision: settings.transform_precision,
            };

            let mut plugin = self.registry.create(name, &params)?;
            traverse(doc, plugin.as_mut())?;
        }
        Ok(())
    }

    fn transform_pass(&self, data: &str, settings: &Settings, write: WriteOptions) -> OptimizerResult<OptimizedSvg> {
        let mut doc = parse_document(data)?;

        if settings.transform.trim_whitespace {
            traverse(&mut doc, &mut TrimWhitespace::new())?;
        }
        if let Some(options) = ResizeOptions::from_settings(&settings.transform) {
            traverse(&mut doc, &mut Resize::new(options))?;
        }

        let mut extractor = DimensionsExtractor::default();
        traverse(&mut doc, &mut extractor)?;

        Ok(OptimizedSvg {
            data: write_document(&doc, write)?,
            dimensions: extractor.dimensions,
        })
    }
}

impl Default for SvgOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PluginToggles;

    fn only(plugins: &[&str]) -> PluginToggles {
        plugins.iter().map(|name| (name.to_string(), true)).collect()
    }

    #[test]
    fn test_trim_end_to_end() {
        let optimizer = SvgOptimizer::new();
        let mut settings = Settings::default();
        settings.transform.trim_whitespace = true;

        let result = optimizer
            .optimize(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300"><rect width="100" height="100" fill="red"/></svg>"#,
                &settings,
            )
            .unwrap();

        assert!(result.data.contains(r#"viewBox="0 0 100 100""#), "{}", result.data);
        assert!(!result.data.contains("width=\"300\""));
        assert!(!result.data.contains("height=\"300\""));
        assert_eq!(result.dimensions, Dimensions::new(100.0, 100.0));
    }

    #[test]
    fn test_resize_runs_after_trim() {
        let optimizer = SvgOptimizer::new();
        let mut settings = Settings::default();
        settings.plugins = only(&[]);
        settings.transform.trim_whitespace = true;
        settings.transform.enable_resize = true;
        settings.transform.max_width = 50.0;

        let result = optimizer
            .optimize(r#"<svg width="500" height="500"><rect x="10" y="10" width="200" height="100"/></svg>"#, &settings)
            .unwrap();

        assert_eq!(result.data, r#"<svg viewBox="10 10 200 100" width="50" height="25"><rect x="10" y="10" width="200" height="100"/></svg>"#);
        assert_eq!(result.dimensions, Dimensions::new(50.0, 25.0));
    }

    #[test]
    fn test_plugins_run_in_order() {
        let optimizer = SvgOptimizer::new();
        let mut settings = Settings::default();
        settings.plugins = only(&["removeComments", "removeEmptyContainers"]);

        let result = optimizer
            .optimize("<svg width=\"4\" height=\"2\"><!-- c --><g><!-- only a comment --></g></svg>", &settings)
            .unwrap();
        assert_eq!(result.data, r#"<svg width="4" height="2"/>"#);
        assert_eq!(result.dimensions, Dimensions::new(4.0, 2.0));
    }

    #[test]
    fn test_zero_precision_quirk() {
        let optimizer = SvgOptimizer::new();
        let mut settings = Settings::default();
        settings.plugins = only(&["cleanupNumericValues"]);
        settings.float_precision = 0;

        let result = optimizer.optimize(r#"<svg><rect x="1.26"/></svg>"#, &settings).unwrap();
        assert_eq!(result.data, r#"<svg><rect x="1.3"/></svg>"#);
    }

    #[test]
    fn test_pretty_output() {
        let optimizer = SvgOptimizer::new();
        let mut settings = Settings::default();
        settings.plugins = only(&[]);
        settings.pretty = true;

        let result = optimizer.optimize("<svg><g><rect/></g></svg>", &settings).unwrap();
        assert_eq!(result.data, "<svg>\n  <g>\n    <rect/>\n  </g>\n</svg>\n");
    }

    #[test]
    fn test_multipass_never_grows() {
        let optimizer = SvgOptimizer::new();
        let source = r#"<svg width="10" height="10"><g><g><g/></g></g><rect x="0.12345" width="1"/></svg>"#;

        let single = optimizer.optimize(source, &Settings::default()).unwrap();
        let mut settings = Settings::default();
        settings.multipass = true;
        let multi = optimizer.optimize(source, &settings).unwrap();

        assert!(multi.data.len() <= single.data.len());
        assert_eq!(multi.dimensions, single.dimensions);
    }

    #[test]
    fn test_pipeline_errors() {
        let optimizer = SvgOptimizer::new();

        let mut settings = Settings::default();
        settings.plugins.set("removeEverything", true);
        let err = optimizer.optimize("<svg/>", &settings).unwrap_err();
        assert_eq!(err.to_string(), "Unknown plugin \"removeEverything\"");

        assert!(optimizer.optimize("<svg><g></svg>", &Settings::default()).is_err());
        assert!(optimizer.wrap_original("not xml at all").is_err());
    }

    #[test]
    fn test_wrap_original() {
        let optimizer = SvgOptimizer::new();
        assert_eq!(
            optimizer.wrap_original(r#"<svg viewBox="0 0 24 12"><path d="M0 0"/></svg>"#).unwrap(),
            Dimensions::new(24.0, 12.0)
        );
        assert!(optimizer.wrap_original("<svg/>").unwrap().is_empty());
    }
}
