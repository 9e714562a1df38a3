//! `decorate` command: run the page load lifecycle over published pages.
//!
//! Pages are read from the site root, loaded one after another on a
//! current-thread runtime (sharing one session, like a visitor clicking
//! through the site) and written, decorated, under the output directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::cli::DecorateArgs;
use crate::config::SiteConfig;
use crate::loader::{LoadContext, LoadEvent, Session, Source, run_page};
use crate::page::{Page, PageUrl};
use crate::{debug, log};

/// Run the decorate command.
pub fn run_decorate(args: &DecorateArgs, config: &SiteConfig) -> Result<()> {
    let site_root = args.site_root.clone().unwrap_or_else(|| config.root.clone());
    let base = url::Url::parse(&args.url_base)
        .with_context(|| format!("invalid --url-base `{}`", args.url_base))?;

    let source = Source::dir(&site_root, config.load.fetch_timeout());
    let session = Session::new();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;

    for file in &args.files {
        let relative = site_relative(file, &site_root)?;
        let html = fs::read_to_string(site_root.join(&relative))
            .with_context(|| format!("failed to read {}", file.display()))?;

        let mut url = base
            .join(&page_path(&relative))
            .with_context(|| format!("cannot build a URL for {}", file.display()))?;
        url.set_fragment(args.hash.as_deref());

        let page = Page::parse(&html, PageUrl::from(url));
        let (page, events) = runtime.block_on(async {
            let ctx = LoadContext::for_page(config, &source, &session, &page).with_viewport(args.viewport);
            let load = run_page(page, &ctx).await;
            let (page, report) = if args.skip_delayed {
                load.skip_delayed()
            } else {
                load.finish().await
            };
            (page, report.events)
        });
        debug!("decorate"; "{}: {}", relative.display(), describe(&events));

        let out = args.output.join(&relative);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&out, page.to_html()).with_context(|| format!("failed to write {}", out.display()))?;
        log!("decorate"; "{} -> {}", relative.display(), out.display());
    }
    Ok(())
}

/// Path of `file` relative to the site root.
fn site_relative(file: &Path, site_root: &Path) -> Result<PathBuf> {
    let relative = if file.is_absolute() {
        file.strip_prefix(site_root)
            .with_context(|| format!("{} is outside the site root {}", file.display(), site_root.display()))?
            .to_path_buf()
    } else {
        file.to_path_buf()
    };
    if relative.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
        bail!("{} is outside the site root", file.display());
    }
    Ok(relative)
}

/// URL path a page file is served at: `index.html` names its directory and
/// other pages drop the `.html` extension.
fn page_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    match segments.last().map(String::as_str) {
        Some("index.html") => {
            segments.pop();
            let dir = segments.join("/");
            if dir.is_empty() { "/".to_string() } else { format!("/{dir}/") }
        }
        Some(last) => {
            let stem = last.strip_suffix(".html").unwrap_or(last).to_string();
            segments.pop();
            segments.push(stem);
            format!("/{}", segments.join("/"))
        }
        None => "/".to_string(),
    }
}

fn describe(events: &[LoadEvent]) -> String {
    events
        .iter()
        .map(|e| format!("{e:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><meta name="template" content="interior"></head>
        <body><header></header><main><div><h1>Trails</h1></div></main><footer></footer></body></html>"#;

    fn args(files: &[&str], site_root: &Path, output: &Path) -> DecorateArgs {
        DecorateArgs {
            files: files.iter().map(PathBuf::from).collect(),
            site_root: Some(site_root.to_path_buf()),
            url_base: "https://www.greeleygov.com/".into(),
            hash: None,
            viewport: 1200,
            output: output.to_path_buf(),
            fetch_timeout: None,
            no_delay: true,
            skip_delayed: false,
        }
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path(Path::new("index.html")), "/");
        assert_eq!(page_path(Path::new("parks/index.html")), "/parks/");
        assert_eq!(page_path(Path::new("parks/trails.html")), "/parks/trails");
        assert_eq!(page_path(Path::new("./parks/trails")), "/parks/trails");
    }

    #[test]
    fn test_site_relative() {
        let root = Path::new("/srv/site");
        assert_eq!(site_relative(Path::new("/srv/site/a.html"), root).unwrap(), PathBuf::from("a.html"));
        assert_eq!(site_relative(Path::new("a/b.html"), root).unwrap(), PathBuf::from("a/b.html"));
        assert!(site_relative(Path::new("/etc/passwd"), root).is_err());
        assert!(site_relative(Path::new("../a.html"), root).is_err());
    }

    #[test]
    fn test_decorate_writes_pages() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        fs::create_dir_all(site.join("parks")).unwrap();
        fs::write(site.join("parks/trails.html"), PAGE).unwrap();
        fs::write(site.join("nav.plain.html"), "<div><p>Greeley</p></div>").unwrap();
        fs::write(site.join("parks/sidebar.plain.html"), "<div><p>Parks menu</p></div>").unwrap();
        let out = tmp.path().join("out");

        let mut config = SiteConfig::default();
        config.load.delayed_ms = 0;
        run_decorate(&args(&["parks/trails.html"], &site, &out), &config).unwrap();

        let html = fs::read_to_string(out.join("parks/trails.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"class="category-banner""#));
        assert!(html.contains(r#"<nav id="nav" aria-expanded="false">"#));
        assert!(html.contains("Parks menu"));
        assert!(html.contains(r#"<script type="module" src="/scripts/delayed.js"></script>"#));
    }

    #[test]
    fn test_missing_page_fails() {
        let tmp = TempDir::new().unwrap();
        let result = run_decorate(&args(&["missing.html"], tmp.path(), tmp.path()), &SiteConfig::default());
        assert!(result.is_err());
    }
}
