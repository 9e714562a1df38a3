//! Block markup: creation, decoration and configuration rows.
//!
//! A block is authored as a `div` whose first class names it, holding rows
//! (`div`) of cells (`div`):
//!
//! ```text
//! div.query-list
//! └── div            row
//!     ├── div        cell: "News"
//!     └── div        cell: "3"
//! ```

use crate::dom::{Element, Node};
use crate::page::Page;
use crate::pipeline::{Transform, to_class_name};
use crate::utils::html::is_block_element;

/// Build a block element from rows of cells.
///
/// Each cell is a list of nodes; an empty cell yields an empty `div`.
pub fn build_block(name: &str, rows: Vec<Vec<Vec<Node>>>) -> Element {
    let mut block = Element::new("div").class(name);
    for row in rows {
        let mut row_el = Element::new("div");
        for cell in row {
            let mut cell_el = Element::new("div");
            cell_el.children = cell;
            row_el.push(cell_el);
        }
        block.push(row_el);
    }
    block
}

/// Mark `block` as a block named after its first class.
///
/// Returns the block name when the element was newly decorated; blocks that
/// already carry a status are left alone. The caller adds the
/// `<name>-wrapper` / `<name>-container` classes to the ancestors.
pub fn decorate_block(block: &mut Element) -> Option<String> {
    let name = block.first_class()?.to_string();
    if block.attrs.contains("data-block-status") {
        return None;
    }
    block.add_class("block");
    block.set_attr("data-block-name", &name);
    block.set_attr("data-block-status", "initialized");
    wrap_text_cells(block);
    Some(name)
}

/// Cells holding only inline content get it wrapped in a `<p>`, so block
/// styles can rely on a block-level child.
fn wrap_text_cells(block: &mut Element) {
    for row in block.element_children_mut() {
        for cell in row.element_children_mut() {
            let inline_only = !cell.children.is_empty()
                && cell.children.iter().any(|n| matches!(n, Node::Text(t) if !t.trim().is_empty()))
                && cell
                    .element_children()
                    .all(|e| !is_block_element(&e.tag));
            if inline_only {
                let mut p = Element::new("p");
                p.children = std::mem::take(&mut cell.children);
                cell.push(p);
            }
        }
    }
}

/// Read a key/value block (two-cell rows) into ordered pairs.
///
/// Keys go through [`to_class_name`]. Values are the link target when the
/// cell holds links, the image source when it holds images, and the text
/// otherwise; several links, images or paragraphs are joined with `", "`.
pub fn read_block_config(block: &Element) -> Vec<(String, String)> {
    let mut config = Vec::new();
    for row in block.element_children() {
        let mut cells = row.element_children();
        let (Some(key), Some(value)) = (cells.next(), cells.next()) else {
            continue;
        };
        let name = to_class_name(&key.text_content());
        config.push((name, cell_value(value)));
    }
    config
}

fn cell_value(cell: &Element) -> String {
    let collect = |tag: &str, attr: Option<&str>| -> Vec<String> {
        let mut out = Vec::new();
        cell.walk(&mut |e| {
            if e.tag == tag {
                out.push(match attr {
                    Some(attr) => e.get_attr(attr).unwrap_or_default().to_string(),
                    None => e.text_content().trim().to_string(),
                });
            }
        });
        out
    };

    for (tag, attr) in [("a", Some("href")), ("img", Some("src")), ("p", None)] {
        let values = collect(tag, attr);
        if !values.is_empty() {
            return values.join(", ");
        }
    }
    cell.text_content().trim().to_string()
}

/// Decorates every `div.section > div > div` in `main` as a block.
pub struct BlockDecorator;

impl BlockDecorator {
    pub fn decorate(main: &mut Element) {
        for section in main.element_children_mut() {
            if section.tag != "div" || !section.has_class("section") {
                continue;
            }
            let mut containers = Vec::new();
            for wrapper in section.element_children_mut() {
                if wrapper.tag != "div" {
                    continue;
                }
                let mut wrappers = Vec::new();
                for block in wrapper.element_children_mut() {
                    if block.tag == "div"
                        && let Some(name) = decorate_block(block)
                    {
                        wrappers.push(name);
                    }
                }
                for name in wrappers {
                    wrapper.add_class(&format!("{name}-wrapper"));
                    containers.push(name);
                }
            }
            for name in containers {
                section.add_class(&format!("{name}-container"));
            }
        }
    }
}

impl Transform for BlockDecorator {
    fn transform(self, mut page: Page) -> Page {
        if let Some(main) = page.main_mut() {
            Self::decorate(main);
        }
        page
    }
}
