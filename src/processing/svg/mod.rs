//! SVG document model: parsing, serialization and traversal.

mod ast;
mod parser;
mod visitor;
mod writer;

pub use ast::{Attribute, Document, Element, Node};
pub use parser::parse_document;
pub use visitor::{Visitor, traverse};
pub use writer::{WriteOptions, write_document};
