//! Section loading: run every block of a section, then reveal it.

use crate::blocks::{BLOCK_STATUS, BlockSlot, load_block};
use crate::dom::{Element, NodePath, Selector};
use crate::pipeline::{HIDDEN_STYLE, SECTION_STATUS};

use super::LoadContext;

/// Load the blocks of one section in document order.
///
/// Blocks are looked up again after every load: a decorator may replace its
/// block with arbitrary content, which shifts the paths behind it.
pub async fn load_section(section: &mut Element, ctx: &LoadContext<'_>) {
    if matches!(section.get_attr(SECTION_STATUS), Some("loading" | "loaded")) {
        return;
    }
    section.set_attr(SECTION_STATUS, "loading");

    while let Some(path) = next_pending_block(section) {
        let Some((&index, parent)) = path.split_last() else {
            break;
        };
        let Some(parent) = section.get_mut(parent) else {
            break;
        };
        load_block(BlockSlot::new(parent, index), ctx).await;
    }

    section.set_attr(SECTION_STATUS, "loaded");
    if section.get_attr("style") == Some(HIDDEN_STYLE) {
        section.remove_attr("style");
    }
}

/// Load every not-yet-loaded section of `main`, one after another.
pub async fn load_sections(main: &mut Element, ctx: &LoadContext<'_>) {
    for section in main.element_children_mut() {
        if section.has_class("section") {
            load_section(section, ctx).await;
        }
    }
}

fn next_pending_block(section: &Element) -> Option<NodePath> {
    section
        .find_paths(&Selector::parse("div.block"))
        .into_iter()
        .find(|path| {
            section
                .get(path)
                .is_some_and(|b| b.get_attr(BLOCK_STATUS) == Some("initialized"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::dom::parse_element;
    use crate::loader::{Session, Source};
    use crate::page::{Metadata, PageUrl};
    use crate::pipeline::decorate_block;
    use std::time::Duration;

    fn section(blocks: &[&str]) -> Element {
        let mut section = parse_element(r#"<div class="section" data-section-status="initialized" style="display: none"></div>"#).unwrap();
        for name in blocks {
            let mut block = Element::new("div").class(name);
            decorate_block(&mut block);
            section.push(Element::new("div").child(block));
        }
        section
    }

    #[tokio::test]
    async fn test_section_loaded_and_revealed() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1));
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());

        let mut section = section(&["cards", "columns"]);
        load_section(&mut section, &ctx).await;

        assert_eq!(section.get_attr(SECTION_STATUS), Some("loaded"));
        assert!(section.get_attr("style").is_none());
        let statuses: Vec<_> = section
            .find_all(&Selector::parse("div.block"))
            .into_iter()
            .map(|b| b.get_attr(BLOCK_STATUS))
            .collect();
        assert_eq!(statuses, [Some("loaded"), Some("loaded")]);
    }

    #[tokio::test]
    async fn test_loaded_section_not_reloaded() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1));
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());

        let mut section = section(&["query-list"]);
        section.set_attr(SECTION_STATUS, "loaded");
        load_section(&mut section, &ctx).await;

        let block = section.find(&Selector::parse("div.block")).unwrap();
        assert_eq!(block.get_attr(BLOCK_STATUS), Some("initialized"));
        assert_eq!(section.get_attr("style"), Some(HIDDEN_STYLE));
    }

    #[tokio::test]
    async fn test_load_sections_skips_non_sections() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1));
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());

        let mut main = Element::new("main")
            .child(section(&[]))
            .child(Element::new("p").attr(SECTION_STATUS, "initialized"));
        load_sections(&mut main, &ctx).await;

        let children: Vec<_> = main.element_children().map(|e| e.get_attr(SECTION_STATUS)).collect();
        assert_eq!(children, [Some("loaded"), Some("initialized")]);
    }
}
