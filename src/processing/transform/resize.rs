//! Proportional resize of the root element.

use tracing::debug;

use super::dimensions::viewbox_size;
use crate::core::TransformSettings;
use crate::processing::svg::{Element, Visitor};
use crate::utils::{OptimizerResult, format_number, parse_leading_number, round_to};

/// Size constraints; zero limits and a 100% scale leave the size alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    pub max_width: f64,
    pub max_height: f64,
    pub scale_percent: f64,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self { max_width: 0.0, max_height: 0.0, scale_percent: 100.0 }
    }
}

impl ResizeOptions {
    /// Resize options from transform settings, `None` when resizing is off or
    /// would change nothing.
    pub fn from_settings(settings: &TransformSettings) -> Option<Self> {
        if !settings.enable_resize {
            return None;
        }

        let scale_percent = if settings.scale_percent == 0.0 { 100.0 } else { settings.scale_percent };
        let options = Self {
            max_width: settings.max_width,
            max_height: settings.max_height,
            scale_percent,
        };
        options.is_meaningful().then_some(options)
    }

    pub fn is_meaningful(&self) -> bool {
        self.max_width > 0.0 || self.max_height > 0.0 || self.scale_percent != 100.0
    }

    /// Computes the new size for `width` × `height`.
    ///
    /// Scale applies first, then the width limit, then the height limit
    /// against the possibly shrunk height. The aspect ratio is kept and the
    /// result is rounded to 2 decimal places.
    pub fn fit(&self, width: f64, height: f64) -> (f64, f64) {
        let aspect = width / height;
        let (mut new_width, mut new_height) = (width, height);

        if self.scale_percent != 100.0 {
            new_width = width * self.scale_percent / 100.0;
            new_height = height * self.scale_percent / 100.0;
        }

        if self.max_width > 0.0 && new_width > self.max_width {
            new_width = self.max_width;
            new_height = new_width / aspect;
        }

        if self.max_height > 0.0 && new_height > self.max_height {
            new_height = self.max_height;
            new_width = new_height * aspect;
        }

        (round_to(new_width, 2), round_to(new_height, 2))
    }
}

/// Rewrites the root `width`/`height` to satisfy [`ResizeOptions`].
///
/// The current size comes from explicit attributes, or the viewBox when they
/// are not both present. A viewBox of the original size is added when the
/// root has none, so the content scales with the new size.
#[derive(Debug)]
pub struct Resize {
    options: ResizeOptions,
}

impl Resize {
    pub fn new(options: ResizeOptions) -> Self {
        Self { options }
    }
}

impl Visitor for Resize {
    fn enter(&mut self, el: &mut Element, is_root: bool) -> OptimizerResult<()> {
        if !is_root || el.name != "svg" {
            return Ok(());
        }

        let (width, height) = match (el.attr("width"), el.attr("height")) {
            (Some(w), Some(h)) => (parse_leading_number(w), parse_leading_number(h)),
            _ => el.attr("viewBox").map(viewbox_size).unwrap_or((None, None)),
        };

        let (Some(width), Some(height)) = (width, height) else {
            debug!("Resize skipped: document has no size");
            return Ok(());
        };
        if width <= 0.0 || height <= 0.0 {
            debug!("Resize skipped: non-positive size {}x{}", width, height);
            return Ok(());
        }

        let (new_width, new_height) = self.options.fit(width, height);
        debug!("Resizing {}x{} to {}x{}", width, height, new_width, new_height);

        el.set_attr("width", format_number(new_width));
        el.set_attr("height", format_number(new_height));

        let has_viewbox = el.attr("viewBox").is_some_and(|v| !v.trim().is_empty());
        if !has_viewbox {
            el.set_attr(
                "viewBox",
                format!("0 0 {} {}", format_number(width), format_number(height)),
            );
        }
        Ok(())
    }
}
