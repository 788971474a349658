//! Core types for optimization settings and results.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::{OptimizerResult, read_text};

/// Built-in plugins in the order they run by default, with their default state.
const DEFAULT_PLUGINS: &[(&str, bool)] = &[
    ("removeDoctype", true),
    ("removeXMLProcInst", true),
    ("removeComments", true),
    ("removeMetadata", true),
    ("removeEditorsNSData", true),
    ("cleanupAttrs", true),
    ("removeTitle", true),
    ("removeDesc", true),
    ("cleanupNumericValues", true),
    ("convertTransform", true),
    ("removeEmptyAttrs", true),
    ("removeEmptyContainers", true),
    ("removeDimensions", false),
    ("sortAttrs", false),
];

/// Configuration settings for SVG optimization.
///
/// Mirrors the options a settings provider hands over; unknown JSON fields are
/// ignored and missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Plugin name → enabled, in run order
    pub plugins: PluginToggles,
    /// Decimal places kept by numeric plugins
    pub float_precision: u32,
    /// Decimal places kept inside transform values
    pub transform_precision: u32,
    /// Re-run the plugin pass until the output stops shrinking
    pub multipass: bool,
    /// Indent the output
    pub pretty: bool,
    /// Show the original document instead of optimizing
    pub original: bool,
    /// Report gzip-compressed sizes (display only)
    pub gzip: bool,
    /// Cache key derived from every output-affecting option
    pub fingerprint: String,
    /// Post-optimization transforms
    pub transform: TransformSettings,
}

/// Settings for the second, transform-only pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformSettings {
    /// Fit the viewBox to the visible content
    pub trim_whitespace: bool,
    /// Whether the resize options below apply
    pub enable_resize: bool,
    /// Maximum output width, 0 for none
    pub max_width: f64,
    /// Maximum output height, 0 for none
    pub max_height: f64,
    /// Uniform scale in percent, 100 for none
    pub scale_percent: f64,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            trim_whitespace: false,
            enable_resize: false,
            max_width: 0.0,
            max_height: 0.0,
            scale_percent: 100.0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plugins: DEFAULT_PLUGINS
                .iter()
                .map(|(name, enabled)| (name.to_string(), *enabled))
                .collect(),
            float_precision: 3,
            transform_precision: 5,
            multipass: false,
            pretty: false,
            original: false,
            gzip: false,
            fingerprint: String::new(),
            transform: TransformSettings::default(),
        }
    }
}

/// The option subset that changes the optimized output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    plugins: &'a PluginToggles,
    float_precision: u32,
    transform_precision: u32,
    multipass: bool,
    pretty: bool,
    transform: &'a TransformSettings,
}

impl Settings {
    /// Parses settings from JSON text and fills in the fingerprint.
    pub fn from_json(json: &str) -> OptimizerResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.with_fingerprint())
    }

    /// Loads settings from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> OptimizerResult<Self> {
        let json = read_text(path).await?;
        Self::from_json(&json)
    }

    /// Hash of every option that affects the optimized output.
    ///
    /// `original`, `gzip` and the fingerprint itself are excluded: toggling them
    /// never changes what the engine produces.
    pub fn compute_fingerprint(&self) -> String {
        let options = OutputOptions {
            plugins: &self.plugins,
            float_precision: self.float_precision,
            transform_precision: self.transform_precision,
            multipass: self.multipass,
            pretty: self.pretty,
            transform: &self.transform,
        };
        let canonical = serde_json::to_vec(&options).unwrap_or_default();
        blake3::hash(&canonical).to_hex()[..16].to_string()
    }

    /// Returns the settings with `fingerprint` recomputed.
    pub fn with_fingerprint(mut self) -> Self {
        self.fingerprint = self.compute_fingerprint();
        self
    }
}

/// Ordered plugin toggles.
///
/// Serialized as a JSON object; the order of its keys is the run order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginToggles(IndexMap<String, bool>);

impl PluginToggles {
    /// Names of the enabled plugins, in run order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|(_, on)| **on).map(|(name, _)| name.as_str())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    /// Enables or disables `name`, appending it when it is not listed yet.
    pub fn set(&mut self, name: &str, enabled: bool) {
        self.0.insert(name.to_string(), enabled);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Run order is part of the value.
impl PartialEq for PluginToggles {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl FromIterator<(String, bool)> for PluginToggles {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Width and height read from a document's root element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height) }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Output of the `process` action: optimized text plus its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedSvg {
    pub data: String,
    pub dimensions: Dimensions,
}

/// An SVG document together with its derived dimensions.
///
/// Used both for the loaded original and for optimization results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgFile {
    pub text: String,
    pub dimensions: Dimensions,
}

impl SvgFile {
    pub fn new(text: impl Into<String>, dimensions: Dimensions) -> Self {
        Self { text: text.into(), dimensions }
    }

    /// Size in bytes, or the gzip-compressed size when `compress` is set.
    pub fn size(&self, compress: bool) -> OptimizerResult<usize> {
        if !compress {
            return Ok(self.text.len());
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(self.text.as_bytes())?;
        Ok(encoder.finish()?.len())
    }
}

impl From<OptimizedSvg> for SvgFile {
    fn from(optimized: OptimizedSvg) -> Self {
        Self { text: optimized.data, dimensions: optimized.dimensions }
    }
}

/// Sizes handed to the result view after a result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultUpdate {
    /// Size of the original, absent when the original itself is shown
    pub comparison_size: Option<usize>,
    /// Size of the shown document
    pub size: usize,
}
