//! `sidebar` block: the interior page's `aside`.
//!
//! The sidebar of `/services/parks/trails` lives at
//! `/services/parks/sidebar` relative to the site root: drop the leading
//! root segment and the page slug, then append `sidebar`.

use super::{BlockError, BlockSlot, load_fragment};
use crate::debug;
use crate::dom::Selector;
use crate::loader::LoadContext;

/// Sidebar fragment path for a page path.
///
/// ```ignore
/// assert_eq!(sidebar_path("/a/b/c"), "/a/b/sidebar");
/// assert_eq!(sidebar_path("/about"), "/sidebar");
/// ```
pub fn sidebar_path(page_path: &str) -> String {
    let mut segments: Vec<&str> = page_path.split('/').collect();
    if !segments.is_empty() {
        segments.remove(0);
    }
    segments.pop();

    if segments.is_empty() {
        "/sidebar".to_string()
    } else {
        format!("/{}/sidebar", segments.join("/"))
    }
}

pub(super) async fn decorate(slot: &mut BlockSlot<'_>, ctx: &LoadContext<'_>) -> Result<(), BlockError> {
    let path = sidebar_path(ctx.url.path());
    let fragment = load_fragment(&path, ctx).await;

    let section_classes = fragment.as_ref().and_then(|main| {
        main.find(&Selector::parse(".section"))
            .map(|s| s.get_attr("class").unwrap_or_default().to_string())
    });

    match (fragment, section_classes) {
        (Some(main), Some(classes)) => {
            slot.parent.set_attr("class", &classes);
            slot.replace_with(main.children);
        }
        _ => {
            debug!("lazy"; "no sidebar at {path}");
            slot.parent.children.clear();
            slot.parent.clear_classes();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::mount_block;
    use crate::config::SiteConfig;
    use crate::dom::Element;
    use crate::loader::{Session, Source};
    use crate::page::{Metadata, PageUrl};
    use std::time::Duration;

    #[test]
    fn test_sidebar_path() {
        assert_eq!(sidebar_path("/a/b/c"), "/a/b/sidebar");
        assert_eq!(sidebar_path("/a/b/c"), sidebar_path("/a/b/c"));
        assert_eq!(sidebar_path("/a/b/"), "/a/b/sidebar");
        assert_eq!(sidebar_path("/about"), "/sidebar");
        assert_eq!(sidebar_path("/"), "/sidebar");
        assert_eq!(sidebar_path(""), "/sidebar");
    }

    async fn load(source: &Source) -> Element {
        let config = SiteConfig::default();
        let session = Session::new();
        let ctx = LoadContext::new(
            &config,
            source,
            &session,
            PageUrl::from_path("/services/parks/trails"),
            Metadata::default(),
        );
        let mut aside = Element::new("aside");
        mount_block(&mut aside, "sidebar", &ctx).await;
        aside
    }

    #[tokio::test]
    async fn test_sidebar_filled_from_fragment() {
        let source = Source::memory(Duration::from_secs(1)).with_file(
            "/services/parks/sidebar.plain.html",
            r#"<div><ul><li><a href="/services/parks/trails">Trails</a></li></ul></div>"#,
        );
        let aside = load(&source).await;

        assert!(aside.has_class("section"));
        assert!(!aside.has_class("sidebar-wrapper"));
        assert!(aside.find(&Selector::parse("div.sidebar")).is_none());
        assert!(aside.find(&Selector::tag("ul")).is_some());
    }

    #[tokio::test]
    async fn test_sidebar_fragment_with_sidebar_block_terminates() {
        let source = Source::memory(Duration::from_secs(1)).with_file(
            "/services/parks/sidebar.plain.html",
            r#"<div><p>Parks</p><div class="sidebar"><div><div></div></div></div></div>"#,
        );
        let aside = load(&source).await;

        assert!(aside.has_class("section"));
        assert_eq!(source.reads(), ["/services/parks/sidebar.plain.html"]);
        let nested = aside.find(&Selector::parse("div.sidebar")).unwrap();
        assert_eq!(nested.get_attr("data-block-status"), Some("loaded"));
    }

    #[tokio::test]
    async fn test_missing_sidebar_leaves_empty_aside() {
        let source = Source::memory(Duration::from_secs(1));
        let aside = load(&source).await;
        assert!(aside.children.is_empty());
        assert!(aside.get_attr("class").is_none());
        assert_eq!(source.reads()[0], "/services/parks/sidebar.plain.html");
    }
}
