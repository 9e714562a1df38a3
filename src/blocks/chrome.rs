//! `header` and `footer` blocks.
//!
//! Both load a fragment named by page metadata (`nav`, `footer`) and fall
//! back to the site defaults. A missing fragment leaves the block empty.

use super::{BlockError, BlockSlot, load_fragment};
use crate::debug;
use crate::dom::{Element, Node};
use crate::loader::LoadContext;

/// Classes for the first three nav sections, in order.
const NAV_SECTIONS: [&str; 3] = ["brand", "sections", "tools"];

/// Fragment path from metadata `key`, else `default`.
fn fragment_path(ctx: &LoadContext<'_>, key: &str, default: &str) -> String {
    ctx.meta
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| ctx.url.resolve(v.trim()))
        .map_or_else(|| default.to_string(), |url| url.path().to_string())
}

/// Element children of a loaded fragment.
fn take_elements(main: Element) -> Vec<Node> {
    main.children
        .into_iter()
        .filter(|n| matches!(n, Node::Element(_)))
        .collect()
}

pub(super) async fn decorate_header(slot: &mut BlockSlot<'_>, ctx: &LoadContext<'_>) -> Result<(), BlockError> {
    let path = fragment_path(ctx, "nav", &ctx.config.site.nav);
    let fragment = load_fragment(&path, ctx).await;

    let Some(block) = slot.block_mut() else {
        return Ok(());
    };
    block.children.clear();
    let Some(fragment) = fragment else {
        debug!("lazy"; "no nav at {path}");
        return Ok(());
    };

    let mut nav = Element::new("nav")
        .attr("id", "nav")
        .attr("aria-expanded", "false");
    nav.children = take_elements(fragment);
    for (section, class) in nav.element_children_mut().zip(NAV_SECTIONS) {
        section.add_class(&format!("nav-{class}"));
    }

    block.push(Element::new("div").class("nav-wrapper").child(nav));
    Ok(())
}

pub(super) async fn decorate_footer(slot: &mut BlockSlot<'_>, ctx: &LoadContext<'_>) -> Result<(), BlockError> {
    let path = fragment_path(ctx, "footer", &ctx.config.site.footer);
    let fragment = load_fragment(&path, ctx).await;

    let Some(block) = slot.block_mut() else {
        return Ok(());
    };
    block.children.clear();
    let Some(fragment) = fragment else {
        debug!("lazy"; "no footer at {path}");
        return Ok(());
    };

    let mut footer = Element::new("div");
    footer.children = take_elements(fragment);
    block.push(footer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::mount_block;
    use crate::config::SiteConfig;
    use crate::dom::Selector;
    use crate::loader::{Session, Source};
    use crate::page::{Metadata, PageUrl};
    use std::time::Duration;

    fn source() -> Source {
        Source::memory(Duration::from_secs(1))
            .with_file(
                "/nav.plain.html",
                "<div><p>Greeley</p></div><div><ul><li>Services</li></ul></div><div><p>Search</p></div>",
            )
            .with_file("/alt-footer.plain.html", "<div><p>Alt footer</p></div>")
    }

    #[tokio::test]
    async fn test_header_from_default_nav() {
        let config = SiteConfig::default();
        let source = source();
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/news/a"), Metadata::default());

        let mut header = Element::new("header");
        mount_block(&mut header, "header", &ctx).await;

        assert!(header.has_class("header-wrapper"));
        let block = header.first_element_child().unwrap();
        assert_eq!(block.get_attr("data-block-status"), Some("loaded"));
        let nav = block.find(&Selector::parse("nav#nav")).unwrap();
        let classes: Vec<_> = nav.element_children().filter_map(Element::first_class).collect();
        assert_eq!(classes, ["section", "section", "section"]);
        assert!(nav.element_children().nth(1).unwrap().has_class("nav-sections"));
    }

    #[tokio::test]
    async fn test_footer_from_metadata() {
        let config = SiteConfig::default();
        let source = source();
        let session = Session::new();
        let mut meta = Metadata::default();
        meta.insert("footer", "/alt-footer");
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/news/a"), meta);

        let mut footer = Element::new("footer");
        mount_block(&mut footer, "footer", &ctx).await;
        assert_eq!(footer.text_content(), "Alt footer");
    }

    #[tokio::test]
    async fn test_missing_footer_leaves_empty_block() {
        let config = SiteConfig::default();
        let source = source();
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());

        let mut footer = Element::new("footer");
        mount_block(&mut footer, "footer", &ctx).await;
        let block = footer.first_element_child().unwrap();
        assert!(block.children.is_empty());
        assert_eq!(block.get_attr("data-block-status"), Some("loaded"));
    }
}
