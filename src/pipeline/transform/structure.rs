//! Page-level structure driven by metadata.
//!
//! - `HtmlLang`: `<html lang>`
//! - `TemplateAndTheme`: `template` / `theme` metadata as `<body>` classes
//! - `TemplateStructure`: empty `<aside>` after `main` on interior pages
//! - `CategoryBanner`: category banner before the first `<h1>` on interior pages

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SiteConfig;
use crate::dom::{Element, Selector};
use crate::page::Page;
use crate::pipeline::Transform;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9a-z]+").unwrap());

/// Sanitize a name for use as a CSS class.
///
/// Lowercased, runs of anything but `[0-9a-z]` collapsed to `-`, and no
/// leading or trailing `-`.
///
/// ```ignore
/// assert_eq!(to_class_name("Dark Blue!"), "dark-blue");
/// ```
pub fn to_class_name(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

fn is_interior(page: &Page, config: &SiteConfig) -> bool {
    page.metadata().is("template", &config.site.interior_template)
}

// ============================================================================
// <html lang>
// ============================================================================

pub struct HtmlLang<'a> {
    lang: &'a str,
}

impl<'a> HtmlLang<'a> {
    pub const fn new(lang: &'a str) -> Self {
        Self { lang }
    }
}

impl Transform for HtmlLang<'_> {
    fn transform(self, mut page: Page) -> Page {
        page.root.set_attr("lang", self.lang);
        page
    }
}

// ============================================================================
// template and theme classes
// ============================================================================

/// Adds `template` and `theme` metadata values (comma lists) to `<body>`.
pub struct TemplateAndTheme;

impl Transform for TemplateAndTheme {
    fn transform(self, mut page: Page) -> Page {
        let classes: Vec<String> = ["template", "theme"]
            .into_iter()
            .filter_map(|key| page.metadata().get(key))
            .flat_map(|value| value.split(','))
            .map(to_class_name)
            .filter(|c| !c.is_empty())
            .collect();

        let body = page.body_mut();
        for class in &classes {
            body.add_class(class);
        }
        page
    }
}

// ============================================================================
// interior aside
// ============================================================================

/// Appends an empty `<aside>` right after `main` on interior pages.
pub struct TemplateStructure<'a> {
    config: &'a SiteConfig,
}

impl<'a> TemplateStructure<'a> {
    pub const fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }
}

impl Transform for TemplateStructure<'_> {
    fn transform(self, mut page: Page) -> Page {
        if !is_interior(&page, self.config) {
            return page;
        }
        let body = page.body_mut();
        if let Some(mut path) = body.find_path(&Selector::tag("main"))
            && let Some(last) = path.last_mut()
        {
            *last += 1;
            body.insert_at(&path, Element::new("aside"));
        }
        page
    }
}

// ============================================================================
// category banner
// ============================================================================

/// Inserts `<div class="category-banner">` before the first `<h1>` of
/// `main` on interior pages.
pub struct CategoryBanner<'a> {
    config: &'a SiteConfig,
}

impl<'a> CategoryBanner<'a> {
    pub const fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    fn banner(&self, category: &str) -> Element {
        Element::new("div")
            .class("category-banner")
            .text(format!("{} {category}", self.config.site.banner_prefix))
    }
}

impl Transform for CategoryBanner<'_> {
    fn transform(self, mut page: Page) -> Page {
        if !is_interior(&page, self.config) {
            return page;
        }
        let banner = self.banner(page.metadata().get("category").unwrap_or_default());
        if let Some(main) = page.main_mut()
            && let Some(path) = main.find_path(&Selector::tag("h1"))
        {
            main.insert_at(&path, banner);
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageUrl;
    use crate::pipeline::Pipeline;

    fn page(template: &str, body: &str) -> Page {
        Page::parse(
            &format!(
                r#"<html><head><meta name="template" content="{template}"><meta name="category" content="Parks"></head><body>{body}</body></html>"#
            ),
            PageUrl::from_path("/parks/trails"),
        )
    }

    #[test]
    fn test_to_class_name() {
        assert_eq!(to_class_name("Interior"), "interior");
        assert_eq!(to_class_name("  Dark -- Blue!"), "dark-blue");
        assert_eq!(to_class_name("--"), "");
        assert_eq!(to_class_name("6-6"), "6-6");
    }

    #[test]
    fn test_template_and_theme_classes() {
        let page = Page::parse(
            r#"<head><meta name="template" content="Interior, Wide"><meta name="theme" content="dark"></head>"#,
            PageUrl::from_path("/"),
        );
        let page = TemplateAndTheme.transform(page);
        assert_eq!(page.body().unwrap().get_attr("class"), Some("interior wide dark"));
    }

    #[test]
    fn test_interior_aside_and_banner() {
        let config = SiteConfig::default();
        let page = Pipeline::new(page("interior", "<header></header><main><div><h1>Trails</h1></div></main><footer></footer>"))
            .pipe(TemplateStructure::new(&config))
            .pipe(CategoryBanner::new(&config))
            .into_inner();

        let body = page.body().unwrap();
        let tags: Vec<_> = body.element_children().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["header", "main", "aside", "footer"]);

        let section = page.main().unwrap().first_element_child().unwrap();
        let first = section.first_element_child().unwrap();
        assert!(first.has_class("category-banner"));
        assert_eq!(first.text_content(), "City of Greeley Parks");
    }

    #[test]
    fn test_other_templates_untouched() {
        let config = SiteConfig::default();
        let before = page("landing", "<main><div><h1>Home</h1></div></main>");
        let after = Pipeline::new(before.clone())
            .pipe(TemplateStructure::new(&config))
            .pipe(CategoryBanner::new(&config))
            .into_inner();
        assert_eq!(before.to_html(), after.to_html());
    }

    #[test]
    fn test_banner_needs_heading() {
        let config = SiteConfig::default();
        let before = page("interior", "<main><div><p>No heading</p></div></main>");
        let after = CategoryBanner::new(&config).transform(before.clone());
        assert_eq!(before.to_html(), after.to_html());
    }
}
