//! Fragment loading.
//!
//! A fragment is a page body published at `<path>.plain.html`. It is wrapped
//! in `<main>`, decorated like the page's own `main`, and its sections are
//! loaded before it is handed to the block that asked for it.

use std::future::Future;
use std::pin::Pin;

use super::BLOCK_STATUS;
use crate::debug;
use crate::dom::{Element, Node, Selector};
use crate::loader::{LoadContext, load_sections};
use crate::page::{Page, PageUrl};
use crate::pipeline::decorate_main;

/// Blocks that load a fragment of their own. Loaded inside a fragment they
/// would fetch that fragment again with the same page location.
const FRAGMENT_BLOCKS: [&str; 3] = ["sidebar", "header", "footer"];

/// Load the fragment at site path `path`, or `None` when it does not exist.
///
/// Boxed because fragment blocks (header, footer, sidebar) load fragments
/// whose own blocks may load fragments again.
pub fn load_fragment<'a>(
    path: &'a str,
    ctx: &'a LoadContext<'_>,
) -> Pin<Box<dyn Future<Output = Option<Element>> + 'a>> {
    Box::pin(async move {
        if !path.starts_with('/') {
            return None;
        }
        let html = ctx.source.fragment(path).await?;

        let url = ctx
            .url
            .resolve(path)
            .map(PageUrl::from)
            .unwrap_or_else(|| PageUrl::from_path(path));
        let mut page = decorate_main(Page::fragment(&html, url.clone()), ctx.config);

        let body = page.body_mut();
        let index = body
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.tag == "main"))?;
        let Node::Element(mut main) = body.children.remove(index) else {
            return None;
        };

        rebase_media(&mut main, &url);
        settle_fragment_blocks(&mut main, path);
        load_sections(&mut main, ctx).await;
        Some(main)
    })
}

/// Mark nested fragment-loading blocks as loaded so they keep their
/// authored markup.
fn settle_fragment_blocks(main: &mut Element, path: &str) {
    for block_path in main.find_paths(&Selector::parse("div.block")) {
        let Some(block) = main.get_mut(&block_path) else {
            continue;
        };
        let name = block.get_attr("data-block-name").unwrap_or_default().to_string();
        if FRAGMENT_BLOCKS.contains(&name.as_str()) {
            debug!("lazy"; "not loading `{name}` block inside fragment {path}");
            block.set_attr(BLOCK_STATUS, "loaded");
        }
    }
}

/// Point `./media_*` references at the fragment's own location.
fn rebase_media(main: &mut Element, url: &PageUrl) {
    for (selector, attr) in [("img[src]", "src"), ("source[srcset]", "srcset")] {
        for path in main.find_paths(&Selector::parse(selector)) {
            let Some(elem) = main.get_mut(&path) else {
                continue;
            };
            let value = elem.get_attr(attr).unwrap_or_default();
            if !value.starts_with("./media_") {
                continue;
            }
            if let Some(resolved) = url.resolve(value) {
                let rebased = match resolved.query() {
                    Some(query) => format!("{}?{query}", resolved.path()),
                    None => resolved.path().to_string(),
                };
                elem.set_attr(attr, &rebased);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::loader::{Session, Source};
    use crate::page::Metadata;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fragment_decorated_and_loaded() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1)).with_file(
            "/parks/sidebar.plain.html",
            r#"<div><h2>Parks</h2><p><img src="./media_123.png?width=750"></p></div>"#,
        );
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/parks/trails"), Metadata::default());

        let main = load_fragment("/parks/sidebar", &ctx).await.unwrap();
        let section = main.first_element_child().unwrap();
        assert!(section.has_class("section"));
        assert_eq!(section.get_attr("data-section-status"), Some("loaded"));
        assert!(section.get_attr("style").is_none());

        let img = main.find(&Selector::tag("img")).unwrap();
        assert_eq!(img.get_attr("src"), Some("/parks/media_123.png?width=750"));
    }

    #[tokio::test]
    async fn test_nested_fragment_blocks_not_loaded() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1)).with_file(
            "/nav.plain.html",
            concat!(
                r#"<div><p>Greeley</p><div class="header"><div><div></div></div></div></div>"#,
                r#"<div><div class="query-list"><div><div>News</div><div>1</div></div></div></div>"#,
            ),
        );
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());

        let main = load_fragment("/nav", &ctx).await.unwrap();
        let header = main.find(&Selector::parse("div.header")).unwrap();
        assert_eq!(header.get_attr("data-block-status"), Some("loaded"));
        assert!(header.find(&Selector::tag("nav")).is_none());
        assert_eq!(source.reads().iter().filter(|p| p.starts_with("/nav")).count(), 1);

        // other blocks still load
        assert!(main.find(&Selector::parse("ul#list")).is_some());
    }

    #[tokio::test]
    async fn test_missing_and_relative_fragments() {
        let config = SiteConfig::default();
        let source = Source::memory(Duration::from_secs(1)).with_file("nav.plain.html", "<p>x</p>");
        let session = Session::new();
        let ctx = LoadContext::new(&config, &source, &session, PageUrl::from_path("/"), Metadata::default());
        assert!(load_fragment("/nav", &ctx).await.is_none());
        assert!(load_fragment("nav", &ctx).await.is_none());
    }
}
