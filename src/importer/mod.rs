//! Legacy page importer.
//!
//! Turns a page of the old site into a content document:
//!
//! ```text
//! legacy HTML ─▶ remove chrome ─▶ append metadata block ─▶ absolutize images
//!             ─▶ promote first <h2> ─▶ Markdown at generate_document_path(url)
//! ```
//!
//! # Modules
//!
//! - `metadata`: Title, description, image, category and pubdate table
//! - `markdown`: Page tree → Markdown
//! - `path`: Destination path derived from the source URL

mod markdown;
mod metadata;
mod path;

pub use markdown::to_markdown;
pub use metadata::ImportMetadata;
pub use path::generate_document_path;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ImportSectionConfig;
use crate::dom::{Element, Selector};
use crate::page::{Page, PageUrl};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid source URL `{url}`")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read {0}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to write {0}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// One imported page.
#[derive(Debug, Clone)]
pub struct Imported {
    /// The transformed `<body>`.
    pub body: Element,
    pub metadata: ImportMetadata,
    pub markdown: String,
    /// Destination content path, without extension.
    pub path: String,
}

impl Imported {
    /// Write `<out_dir><path>.md`, creating directories as needed.
    pub fn write(&self, out_dir: &Path) -> Result<PathBuf, ImportError> {
        let file = out_dir.join(format!("{}.md", self.path.trim_start_matches('/')));
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| ImportError::Write(parent.to_path_buf(), e))?;
        }
        fs::write(&file, &self.markdown).map_err(|e| ImportError::Write(file.clone(), e))?;
        Ok(file)
    }
}

/// Clean up a legacy page and return its body plus the metadata appended
/// to it.
pub fn transform_dom(
    html: &str,
    url: &str,
    config: &ImportSectionConfig,
) -> Result<(Element, ImportMetadata), ImportError> {
    let page_url = PageUrl::parse(url).map_err(|source| ImportError::Url {
        url: url.to_string(),
        source,
    })?;
    let mut page = Page::parse(html, page_url.clone());

    if !config.remove.is_empty() {
        page.body_mut().remove_all(&Selector::parse(&config.remove_selector()));
    }

    let metadata = ImportMetadata::from_page(&page, config);
    let mut body = std::mem::replace(page.body_mut(), Element::new("body"));
    body.push(metadata.to_block());

    absolutize_images(&mut body, &page_url);
    promote_first_h2(&mut body);

    Ok((body, metadata))
}

/// Import a legacy page from markup.
pub fn import_page(html: &str, url: &str, config: &ImportSectionConfig) -> Result<Imported, ImportError> {
    let (body, metadata) = transform_dom(html, url, config)?;
    Ok(Imported {
        markdown: to_markdown(&body),
        path: generate_document_path(url)?,
        body,
        metadata,
    })
}

/// Import a legacy page saved at `file`.
pub fn import_file(file: &Path, url: &str, config: &ImportSectionConfig) -> Result<Imported, ImportError> {
    let html = fs::read_to_string(file).map_err(|e| ImportError::Read(file.to_path_buf(), e))?;
    import_page(&html, url, config)
}

fn absolutize_images(body: &mut Element, url: &PageUrl) {
    for path in body.find_paths(&Selector::parse("img[src]")) {
        let Some(img) = body.get_mut(&path) else {
            continue;
        };
        let src = img.get_attr("src").unwrap_or_default();
        if let Some(absolute) = url.resolve(src) {
            img.set_attr("src", absolute.as_str());
        }
    }
}

/// Replace the first `<h2>` with an `<h1>` of the same text.
fn promote_first_h2(body: &mut Element) {
    let Some(path) = body.find_path(&Selector::tag("h2")) else {
        return;
    };
    let Some(h2) = body.get_mut(&path) else {
        return;
    };
    let text = h2.text_content().split_whitespace().collect::<Vec<_>>().join(" ");
    let mut h1 = Element::new("h1");
    h1.set_text(&text);
    *h2 = h1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEGACY: &str = r#"<!DOCTYPE html><html><head>
        <title>Trail Closures</title>
        <meta property="og:description" content="Several trails close for repairs.">
        </head><body>
        <header><img src="/logo.png"><nav><a href="/">Home</a></nav></header>
        <div class="breadcrumb-row">Home / News</div>
        <h1>News</h1>
        <div class="content">
          <h2>Trail <em>closures</em> this week</h2>
          <span class="sfitemDate">June 2, 2024</span>
          <p><img src="images/trail.jpg" alt="Trail"></p>
          <p>The <a href="/parks">Parks</a> department announced closures.</p>
          <h2>Details</h2>
        </div>
        <div class="side-content"><p>Related</p></div>
        <footer>City of Greeley</footer>
        </body></html>"#;

    const URL: &str = "https://greeleygov.com/news/Trail Closures.html";

    #[test]
    fn test_transform_dom() {
        let (body, metadata) = transform_dom(LEGACY, URL, &ImportSectionConfig::default()).unwrap();

        for removed in ["header", "nav", "footer", ".breadcrumb-row", ".side-content"] {
            assert!(body.find(&Selector::parse(removed)).is_none(), "{removed} kept");
        }

        let h1s = body.find_all(&Selector::tag("h1"));
        assert_eq!(h1s.len(), 1);
        assert_eq!(h1s[0].text_content(), "Trail closures this week");
        assert_eq!(body.find_all(&Selector::tag("h2")).len(), 1);

        let img = body.find(&Selector::tag("img")).unwrap();
        assert_eq!(img.get_attr("src"), Some("https://greeleygov.com/news/images/trail.jpg"));

        assert_eq!(metadata.image, "images/trail.jpg");
        assert_eq!(metadata.pubdate.as_deref(), Some("June 2, 2024"));
        let table = body.last_element_child().unwrap();
        assert_eq!(table.tag, "table");
        // the metadata image is absolutized with the rest
        let meta_img = table.find(&Selector::tag("img")).unwrap();
        assert_eq!(meta_img.get_attr("src"), Some("https://greeleygov.com/news/images/trail.jpg"));
    }

    #[test]
    fn test_import_page_markdown_and_path() {
        let imported = import_page(LEGACY, URL, &ImportSectionConfig::default()).unwrap();
        assert_eq!(imported.path, "/news/trail-closures");
        assert!(imported.markdown.starts_with("# Trail closures this week\n"));
        assert!(imported.markdown.contains("[Parks](/parks)"));
        assert!(imported.markdown.contains("| Metadata |  |\n| --- | --- |\n| Title | Trail Closures |"));
        assert!(imported.markdown.contains("| Category | News |"));
    }

    #[test]
    fn test_page_without_h2() {
        let (body, _) = transform_dom("<p>Only text</p>", "https://x.com/a", &ImportSectionConfig::default()).unwrap();
        assert!(body.find(&Selector::tag("h1")).is_none());
    }

    #[test]
    fn test_invalid_url() {
        let err = import_page("<p></p>", "not a url", &ImportSectionConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::Url { .. }));
    }

    #[test]
    fn test_write_and_read_errors() {
        let dir = TempDir::new().unwrap();
        let imported = import_page(LEGACY, URL, &ImportSectionConfig::default()).unwrap();
        let file = imported.write(dir.path()).unwrap();
        assert_eq!(file, dir.path().join("news/trail-closures.md"));
        assert_eq!(fs::read_to_string(file).unwrap(), imported.markdown);

        let missing = dir.path().join("missing.html");
        assert!(matches!(
            import_file(&missing, URL, &ImportSectionConfig::default()),
            Err(ImportError::Read(..))
        ));
    }
}
