//! Auto blocks synthesized from page content.
//!
//! Currently only the hero: a `<picture>` that comes before the first
//! `<h1>` in document order is moved, together with the heading, into a
//! `hero` block in a new first section.

use anyhow::{Context, Result};

use crate::dom::{Element, NodePath, Selector};
use crate::log;
use crate::page::Page;
use crate::pipeline::{Transform, build_block};

/// Builds synthetic blocks in `main`. Failures are logged, never fatal.
pub struct AutoBlocks;

impl AutoBlocks {
    pub fn build(main: &mut Element) {
        if let Err(e) = build_hero_block(main) {
            log!("error"; "auto blocking failed: {e:#}");
        }
    }
}

/// Returns whether a hero block was built.
fn build_hero_block(main: &mut Element) -> Result<bool> {
    let (Some(h1_path), Some(picture_path)) = (
        main.find_path(&Selector::tag("h1")),
        main.find_path(&Selector::tag("picture")),
    ) else {
        return Ok(false);
    };

    // vector order is document order
    if picture_path >= h1_path || inside_hero(main, &h1_path) {
        return Ok(false);
    }

    // the h1 comes later, so removing it first keeps the picture path valid
    let h1 = main
        .remove_at(&h1_path)
        .with_context(|| format!("h1 vanished at {h1_path:?}"))?;
    let picture = main
        .remove_at(&picture_path)
        .with_context(|| format!("picture vanished at {picture_path:?}"))?;

    let section = Element::new("div").child(build_block("hero", vec![vec![vec![picture, h1]]]));
    main.prepend(section);
    Ok(true)
}

fn inside_hero(main: &Element, path: &NodePath) -> bool {
    (1..path.len()).any(|len| main.get(&path[..len]).is_some_and(|e| e.has_class("hero")))
}

impl Transform for AutoBlocks {
    fn transform(self, mut page: Page) -> Page {
        if let Some(main) = page.main_mut() {
            Self::build(main);
        }
        page
    }
}
