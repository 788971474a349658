//! Depth-first traversal with enter/exit hooks.

use super::ast::{Document, Element};
use crate::utils::OptimizerResult;

/// A document pass.
///
/// `enter` runs before an element's children are visited and `exit` after, so
/// a visitor sees bottom-up results on exit. Both may rewrite the element and
/// its children in place.
pub trait Visitor {
    /// Runs once before any element is visited.
    fn document(&mut self, _doc: &mut Document) -> OptimizerResult<()> {
        Ok(())
    }

    fn enter(&mut self, _el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        Ok(())
    }

    fn exit(&mut self, _el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        Ok(())
    }
}

/// Runs `visitor` over every element of `doc`.
pub fn traverse(doc: &mut Document, visitor: &mut dyn Visitor) -> OptimizerResult<()> {
    visitor.document(doc)?;

    let mut seen_root = false;
    for node in doc.children.iter_mut() {
        if let Some(el) = node.as_element_mut() {
            let is_root = !seen_root;
            seen_root = true;
            visit(el, is_root, visitor)?;
        }
    }
    Ok(())
}

fn visit(el: &mut Element, is_root: bool, visitor: &mut dyn Visitor) -> OptimizerResult<()> {
    visitor.enter(el, is_root)?;
    for child in el.children.iter_mut() {
        if let Some(child) = child.as_element_mut() {
            visit(child, false, visitor)?;
        }
    }
    visitor.exit(el, is_root)
}
