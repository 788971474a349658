use tracing::debug;

use crate::processing::geometry::{BoundingBox, is_shape, merge_bounds, shape_bounds};
use crate::processing::svg::{Element, Visitor};
use crate::utils::{OptimizerResult, format_number};

/// Fits the root viewBox to the bounds of the visible content.
///
/// Shapes are collected on the way down; the root is rewritten on exit, so
/// the whole tree has been seen by then. Explicit `width` and `height` are
/// dropped to let the new viewBox drive the size.
#[derive(Debug, Default)]
pub struct TrimWhitespace {
    bounds: Option<BoundingBox>,
}

impl TrimWhitespace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for TrimWhitespace {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        if is_shape(&el.name) {
            self.bounds = merge_bounds(self.bounds, shape_bounds(el));
        }
        Ok(())
    }

    fn exit(&mut self, el: &mut Element, is_root: bool) -> OptimizerResult<()> {
        if !is_root || el.name != "svg" {
            return Ok(());
        }

        let Some(bounds) = self.bounds else {
            debug!("Trim skipped: no visible content");
            return Ok(());
        };

        if bounds.width() > 0.0 && bounds.height() > 0.0 {
            let viewbox = format!(
                "{} {} {} {}",
                format_number(bounds.min_x),
                format_number(bounds.min_y),
                format_number(bounds.width()),
                format_number(bounds.height())
            );
            debug!("Trimmed viewBox to {}", viewbox);
            el.set_attr("viewBox", viewbox);
            el.remove_attr("width");
            el.remove_attr("height");
        }
        Ok(())
    }
}
