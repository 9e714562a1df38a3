//! Two-column section layout.
//!
//! A section with `data-layout="A-B"` has its element children split into
//! two wrapper `div`s: the first `B` children go to the first column, the
//! rest to the second. `A` is the first column's grid width and is only
//! validated here.

use std::str::FromStr;

use thiserror::Error;

use crate::dom::{Element, Node, Selector};
use crate::log;
use crate::page::Page;
use crate::pipeline::Transform;

/// Malformed `data-layout` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout `{0}` is not of the form `A-B`")]
    Shape(String),

    #[error("layout `{layout}` has non-numeric segment `{segment}`")]
    Segment { layout: String, segment: String },
}

/// Parsed `"A-B"` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub first: usize,
    pub second: usize,
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| LayoutError::Shape(s.to_string()))?;
        let segment = |seg: &str| {
            seg.trim().parse::<usize>().map_err(|_| LayoutError::Segment {
                layout: s.to_string(),
                segment: seg.to_string(),
            })
        };
        Ok(Self {
            first: segment(a)?,
            second: segment(b)?,
        })
    }
}

impl Layout {
    /// Move the element children of `parent` into the two columns.
    ///
    /// Text nodes stay in `parent`, ahead of the columns.
    pub fn apply(self, parent: &mut Element) {
        let mut kept = Vec::new();
        let mut first = Element::new("div");
        let mut second = Element::new("div");
        let mut count = 0;

        for node in std::mem::take(&mut parent.children) {
            match node {
                Node::Element(e) => {
                    count += 1;
                    if count <= self.second {
                        first.push(e);
                    } else {
                        second.push(e);
                    }
                }
                text => kept.push(text),
            }
        }

        parent.children = kept;
        parent.push(first);
        parent.push(second);
    }
}

/// Applies `data-layout` to every `div[data-layout]` in `main`.
pub struct SectionLayout;

impl SectionLayout {
    pub fn apply(main: &mut Element) {
        // deepest and latest first, so earlier paths stay valid
        let paths = main.find_paths(&Selector::parse("div[data-layout]"));
        for path in paths.into_iter().rev() {
            let Some(section) = main.get_mut(&path) else {
                continue;
            };
            let value = section.get_attr("data-layout").unwrap_or_default();
            match value.parse::<Layout>() {
                Ok(layout) => layout.apply(section),
                Err(e) => log!("error"; "{e}"),
            }
        }
    }
}

impl Transform for SectionLayout {
    fn transform(self, mut page: Page) -> Page {
        if let Some(main) = page.main_mut() {
            Self::apply(main);
        }
        page
    }
}
