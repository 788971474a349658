use crate::core::Settings;
use crate::utils::{OptimizerResult, ValidationError};

/// Cheap check that `text` looks like an SVG document.
///
/// Only looks for a closing `</svg>` tag; real parsing happens in the engine.
pub fn validate_svg_text(text: &str) -> Result<(), ValidationError> {
    if !text.contains("</svg>") {
        return Err(ValidationError::NotSvg);
    }
    Ok(())
}

/// Validates optimizer settings
pub fn validate_settings(settings: &Settings) -> OptimizerResult<()> {
    let transform = &settings.transform;

    if transform.max_width < 0.0 || !transform.max_width.is_finite() {
        return Err(ValidationError::settings(
            format!("Invalid max width: {}", transform.max_width)
        ).into());
    }

    if transform.max_height < 0.0 || !transform.max_height.is_finite() {
        return Err(ValidationError::settings(
            format!("Invalid max height: {}", transform.max_height)
        ).into());
    }

    if transform.scale_percent < 0.0 || !transform.scale_percent.is_finite() {
        return Err(ValidationError::settings(
            format!("Invalid scale percentage: {}", transform.scale_percent)
        ).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_svg_text() {
        assert!(validate_svg_text("<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>").is_ok());
        assert_eq!(validate_svg_text("<svg/>"), Err(ValidationError::NotSvg));
        assert_eq!(validate_svg_text("hello"), Err(ValidationError::NotSvg));
    }

    #[test]
    fn test_validate_settings() {
        let mut settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());

        settings.transform.max_width = -1.0;
        assert!(validate_settings(&settings).is_err());

        settings.transform.max_width = 0.0;
        settings.transform.scale_percent = f64::NAN;
        assert!(validate_settings(&settings).is_err());
    }
}
