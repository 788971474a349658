//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::core::Settings;
use crate::utils::{OptimizerResult, validate_settings};

/// SVG optimizer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// SVG files to optimize
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Settings file (JSON, same shape as the engine settings)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Directory for optimized files; a single file goes to stdout without it
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,

    /// Fit the viewBox to the visible content
    #[arg(long)]
    pub trim: bool,

    /// Maximum output width
    #[arg(long)]
    pub max_width: Option<f64>,

    /// Maximum output height
    #[arg(long)]
    pub max_height: Option<f64>,

    /// Uniform scale in percent
    #[arg(long)]
    pub scale: Option<f64>,

    /// Decimal places kept in numbers
    #[arg(long)]
    pub precision: Option<u32>,

    /// Decimal places kept in transforms
    #[arg(long)]
    pub transform_precision: Option<u32>,

    /// Repeat the plugin pass until the output stops shrinking
    #[arg(long)]
    pub multipass: bool,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Report gzip-compressed sizes
    #[arg(long)]
    pub gzip: bool,
}

impl Cli {
    /// Loads the settings file (or defaults) and applies the flag overrides.
    pub async fn resolve_settings(&self) -> OptimizerResult<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path).await?,
            None => Settings::default(),
        };

        if self.trim {
            settings.transform.trim_whitespace = true;
        }
        if self.max_width.is_some() || self.max_height.is_some() || self.scale.is_some() {
            settings.transform.enable_resize = true;
        }
        if let Some(max_width) = self.max_width {
            settings.transform.max_width = max_width;
        }
        if let Some(max_height) = self.max_height {
            settings.transform.max_height = max_height;
        }
        if let Some(scale) = self.scale {
            settings.transform.scale_percent = scale;
        }
        if let Some(precision) = self.precision {
            settings.float_precision = precision;
        }
        if let Some(precision) = self.transform_precision {
            settings.transform_precision = precision;
        }
        settings.multipass |= self.multipass;
        settings.pretty |= self.pretty;
        settings.gzip |= self.gzip;

        validate_settings(&settings)?;
        Ok(settings.with_fingerprint())
    }
}
