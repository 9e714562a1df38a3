//! Section decoration.
//!
//! Each `main > div` becomes a section. Runs of default content (anything
//! that is not a `div`) are grouped into a `default-content-wrapper`; every
//! nested `div` gets its own wrapper:
//!
//! ```text
//! main > div                 main > div.section[data-section-status]
//!   h2                         div.default-content-wrapper
//!   p               ─▶           h2  p
//!   div.cards                  div
//!                                div.cards
//! ```
//!
//! A `section-metadata` block inside the section is consumed: its rows turn
//! into `data-*` attributes, and `style` values into section classes.

use crate::dom::{Element, Node, Selector};
use crate::page::Page;
use crate::pipeline::{Transform, read_block_config, to_class_name};

/// Style attribute that hides a section until it has loaded.
pub const HIDDEN_STYLE: &str = "display: none";

pub const SECTION_STATUS: &str = "data-section-status";

/// Decorates the sections of `main`.
pub struct SectionDecorator;

impl SectionDecorator {
    pub fn decorate(main: &mut Element) {
        for section in main.element_children_mut() {
            if section.tag == "div" {
                decorate_section(section);
            }
        }
    }
}

fn decorate_section(section: &mut Element) {
    let mut kept = Vec::new();
    let mut wrappers: Vec<Element> = Vec::new();
    let mut in_default = false;

    for node in std::mem::take(&mut section.children) {
        let Node::Element(e) = node else {
            // loose text stays where the browser would leave it
            kept.push(node);
            continue;
        };
        if e.tag == "div" || !in_default {
            in_default = e.tag != "div";
            let mut wrapper = Element::new("div");
            if in_default {
                wrapper.add_class("default-content-wrapper");
            }
            wrappers.push(wrapper);
        }
        if let Some(last) = wrappers.last_mut() {
            last.push(e);
        }
    }

    section.children = kept;
    section.children.extend(wrappers.into_iter().map(Node::from));
    section.add_class("section");
    section.set_attr(SECTION_STATUS, "initialized");
    section.set_attr("style", HIDDEN_STYLE);

    apply_section_metadata(section);
}

fn apply_section_metadata(section: &mut Element) {
    let Some(path) = section.find_path(&Selector::parse("div.section-metadata")) else {
        return;
    };
    let Some(meta) = section.get(&path) else {
        return;
    };

    for (key, value) in read_block_config(meta) {
        if key == "style" {
            for style in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                section.add_class(&to_class_name(style));
            }
        } else if !key.is_empty() {
            section.set_attr(&format!("data-{key}"), &value);
        }
    }

    // drop the metadata block together with its wrapper
    let wrapper = if path.len() > 1 { &path[..path.len() - 1] } else { &path[..] };
    section.remove_at(wrapper);
}

impl Transform for SectionDecorator {
    fn transform(self, mut page: Page) -> Page {
        if let Some(main) = page.main_mut() {
            Self::decorate(main);
        }
        page
    }
}
