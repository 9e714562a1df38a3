//! In-memory page tree.
//!
//! Every stage of the decoration pipeline works on this tree instead of a
//! live browser DOM, so stages can be composed and tested on plain values.
//!
//! ```text
//! HTML ──parse──▶ Node/Element tree ──stages──▶ tree ──render──▶ HTML
//! ```

mod node;
mod parse;
mod render;
mod select;

pub use node::{Attrs, Element, Node, NodePath};
pub use parse::{parse_element, parse_nodes};
pub use render::{render_children, render_document, render_element};
pub use select::Selector;
