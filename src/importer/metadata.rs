//! Metadata block of an imported page.
//!
//! Rendered as the table the content format reads page metadata from:
//!
//! ```text
//! | Metadata    |                   |
//! | Title       | Trail closures    |
//! | Description | …                 |
//! | Image       | ![](…)            |
//! | Category    | News              |
//! | pubdate     | June 2, 2024      |
//! ```

use crate::config::ImportSectionConfig;
use crate::dom::{Element, Selector};
use crate::page::Page;

/// Values collected from the legacy page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMetadata {
    /// `<title>` text without newlines or tabs; absent without a `<title>`.
    pub title: Option<String>,
    /// `og:description`, or empty.
    pub description: String,
    /// `og:image`, else the first image's `src`, else empty.
    pub image: String,
    pub category: String,
    /// Text of the publish date element, when the page has one.
    pub pubdate: Option<String>,
}

impl ImportMetadata {
    /// Read metadata from the legacy document, as left by chrome removal.
    pub fn from_page(page: &Page, config: &ImportSectionConfig) -> Self {
        let title = page
            .head()
            .and_then(|head| head.find(&Selector::tag("title")))
            .map(|t| t.text_content().replace(['\n', '\t'], ""));

        let meta = page.metadata();
        let description = meta.get("og:description").unwrap_or_default().to_string();
        let image = meta
            .get("og:image")
            .map(str::to_string)
            .or_else(|| {
                page.body()?
                    .find(&Selector::tag("img"))?
                    .get_attr("src")
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let pubdate = page
            .body()
            .and_then(|body| body.find(&Selector::parse(&config.pubdate_selector)))
            .map(|e| e.text_content().trim().to_string());

        Self {
            title,
            description,
            image,
            category: config.category.clone(),
            pubdate,
        }
    }

    /// Rows in output order.
    fn rows(&self) -> Vec<(&'static str, Element)> {
        let mut rows = Vec::with_capacity(5);
        if let Some(title) = &self.title {
            rows.push(("Title", cell(title)));
        }
        rows.push(("Description", cell(&self.description)));

        let mut image = Element::new("td");
        if !self.image.is_empty() {
            image.push(Element::new("img").attr("src", &self.image));
        }
        rows.push(("Image", image));

        rows.push(("Category", cell(&self.category)));
        if let Some(pubdate) = &self.pubdate {
            rows.push(("pubdate", cell(pubdate)));
        }
        rows
    }

    /// The `Metadata` table.
    pub fn to_block(&self) -> Element {
        let mut table = Element::new("table").child(
            Element::new("tr").child(Element::new("th").text("Metadata")),
        );
        for (key, value) in self.rows() {
            table.push(Element::new("tr").child(cell(key)).child(value));
        }
        table
    }
}

fn cell(text: &str) -> Element {
    let mut td = Element::new("td");
    td.set_text(text);
    td
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::render_element;
    use crate::page::PageUrl;

    fn page(head: &str, body: &str) -> Page {
        Page::parse(
            &format!("<html><head>{head}</head><body>{body}</body></html>"),
            PageUrl::parse("https://greeleygov.com/news/a").unwrap(),
        )
    }

    #[test]
    fn test_full_metadata() {
        let page = page(
            concat!(
                "<title>\n\tTrail closures</title>",
                r#"<meta property="og:description" content="Closed for repairs">"#,
                r#"<meta property="og:image" content="https://greeleygov.com/og.jpg">"#,
            ),
            r#"<img src="/first.jpg"><span class="sfitemDate"> June 2, 2024 </span>"#,
        );
        let meta = ImportMetadata::from_page(&page, &ImportSectionConfig::default());
        assert_eq!(
            meta,
            ImportMetadata {
                title: Some("Trail closures".into()),
                description: "Closed for repairs".into(),
                image: "https://greeleygov.com/og.jpg".into(),
                category: "News".into(),
                pubdate: Some("June 2, 2024".into()),
            }
        );
    }

    #[test]
    fn test_fallbacks() {
        let meta = ImportMetadata::from_page(&page("", r#"<p><img src="/first.jpg"></p>"#), &ImportSectionConfig::default());
        assert_eq!(meta.title, None);
        assert_eq!(meta.description, "");
        assert_eq!(meta.image, "/first.jpg");
        assert_eq!(meta.pubdate, None);

        let meta = ImportMetadata::from_page(&page("", "<p>no image</p>"), &ImportSectionConfig::default());
        assert_eq!(meta.image, "");
    }

    #[test]
    fn test_block_markup() {
        let meta = ImportMetadata {
            title: None,
            description: String::new(),
            image: String::new(),
            category: "Events".into(),
            pubdate: None,
        };
        assert_eq!(
            render_element(&meta.to_block()),
            concat!(
                "<table><tr><th>Metadata</th></tr>",
                "<tr><td>Description</td><td></td></tr>",
                "<tr><td>Image</td><td></td></tr>",
                "<tr><td>Category</td><td>Events</td></tr></table>"
            )
        );
    }
}
