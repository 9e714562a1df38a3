//! Page load lifecycle: eager, lazy and delayed phases.
//!
//! # Phases
//!
//! ```text
//! eager    lang, body classes, decorate main, banner, `appear`,
//!          first section + first image wait, fonts on wide viewports
//!    │
//! lazy     remaining sections, scroll target,
//!          sidebar ∥ header ∥ footer, lazy styles, fonts
//!    │
//! delayed  after `load.delayed_ms`: deferred module script
//! ```
//!
//! Each phase finishes before the next one starts. Everything runs on one
//! current-thread runtime; the only suspension points are source reads and
//! timers.
//!
//! # Modules
//!
//! - `source`: Where fragments, the index and images come from
//! - `session`: Visit-scoped flags
//! - `index`: Query index entries
//! - `context`: Page-scoped state and the load report
//! - `sections`: Section and block loading

mod context;
mod index;
mod sections;
mod session;
mod source;

pub use context::{ImageWait, LoadContext, LoadEvent, LoadReport};
pub use index::{IndexEntry, PubDate, QueryIndex};
pub use sections::{load_section, load_sections};
pub use session::{FONTS_LOADED, Session, SessionUnavailable};
pub use source::Source;

use tokio::time::Instant;

use crate::blocks::mount_block;
use crate::debug;
use crate::dom::{Element, Node, Selector};
use crate::page::Page;
use crate::pipeline::{CategoryBanner, HtmlLang, Pipeline, TemplateAndTheme, decorate_main};

// ============================================================================
// page load handle
// ============================================================================

/// A page whose eager and lazy phases are done.
///
/// The delayed phase only runs when [`PageLoad::finish`] is awaited;
/// dropping the handle (or calling [`PageLoad::skip_delayed`]) leaves the
/// deferred script out.
#[derive(Debug)]
pub struct PageLoad {
    pub page: Page,
    pub report: LoadReport,
    delayed: Delayed,
}

#[derive(Debug)]
struct Delayed {
    at: Instant,
    script: String,
}

impl PageLoad {
    /// Wait for the delayed phase and insert the deferred script.
    pub async fn finish(self) -> (Page, LoadReport) {
        let Self {
            mut page,
            mut report,
            delayed,
        } = self;

        tokio::time::sleep_until(delayed.at).await;
        load_script(page.head_mut(), &delayed.script);
        report.events.push(LoadEvent::DelayedDone);
        debug!("delayed"; "inserted {}", delayed.script);
        (page, report)
    }

    /// Give up on the delayed phase.
    pub fn skip_delayed(self) -> (Page, LoadReport) {
        (self.page, self.report)
    }
}

/// Run the eager and lazy phases on `page` and schedule the delayed one.
///
/// `ctx` should come from [`LoadContext::for_page`] so that location and
/// metadata match the page.
pub async fn run_page(page: Page, ctx: &LoadContext<'_>) -> PageLoad {
    let page = load_eager(page, ctx).await;
    let (page, scroll_target) = load_lazy(page, ctx).await;

    // the report is complete once lazy is; delayed appends to it
    let report = LoadReport {
        events: ctx.take_events(),
        scroll_target,
    };

    let config = ctx.config;
    let delayed = Delayed {
        at: Instant::now() + config.load.delayed(),
        script: config.site.code_path(&config.load.delayed_script),
    };
    PageLoad {
        page,
        report,
        delayed,
    }
}

// ============================================================================
// eager
// ============================================================================

async fn load_eager(page: Page, ctx: &LoadContext<'_>) -> Page {
    ctx.record(LoadEvent::EagerStarted);
    let config = ctx.config;

    let mut page = Pipeline::new(page)
        .pipe(HtmlLang::new(&config.site.lang))
        .pipe(TemplateAndTheme)
        .into_inner();

    if page.main().is_some() {
        page = Pipeline::new(decorate_main(page, config))
            .pipe(CategoryBanner::new(config))
            .into_inner();
        page.body_mut().add_class("appear");

        if let Some(main) = page.main_mut()
            && let Some(section) = main.element_children_mut().find(|e| e.has_class("section"))
        {
            load_section(section, ctx).await;
            let wait = wait_for_first_image(section, ctx).await;
            ctx.record(LoadEvent::FirstImage(wait));
        }
    }

    let fonts_seen = matches!(ctx.session.get(FONTS_LOADED), Ok(Some(_)));
    if ctx.viewport >= config.load.font_breakpoint || fonts_seen {
        load_fonts(&mut page, ctx);
    }

    ctx.record(LoadEvent::EagerDone);
    page
}

/// Mark the section's first image eager and wait until it is available.
async fn wait_for_first_image(section: &mut Element, ctx: &LoadContext<'_>) -> ImageWait {
    let Some(img) = section.find_mut(&Selector::tag("img")) else {
        return ImageWait::NoImage;
    };
    img.set_attr("loading", "eager");

    let src = img.get_attr("src").unwrap_or_default();
    let Some(path) = ctx.url.site_path(src) else {
        return ImageWait::External;
    };

    let wait = ctx.config.load.image_wait();
    match tokio::time::timeout(wait, ctx.source.is_available(&path)).await {
        Ok(true) => ImageWait::Loaded,
        Ok(false) => ImageWait::Missing,
        Err(_) => {
            debug!("eager"; "gave up on {path} after {wait:?}");
            ImageWait::TimedOut
        }
    }
}

// ============================================================================
// lazy
// ============================================================================

/// Returns the page and its scroll target. The target is looked up once the
/// sections are loaded and before chrome fragments land in the page.
async fn load_lazy(mut page: Page, ctx: &LoadContext<'_>) -> (Page, Option<String>) {
    ctx.record(LoadEvent::LazyStarted);

    if let Some(main) = page.main_mut() {
        load_sections(main, ctx).await;
    }
    ctx.record(LoadEvent::SectionsLoaded);

    let scroll_target = ctx
        .url
        .hash()
        .filter(|id| page.element_by_id(id).is_some())
        .map(str::to_string);
    if let Some(id) = &scroll_target {
        debug!("lazy"; "scroll target #{id}");
    }

    let Landmarks {
        aside,
        header,
        footer,
    } = Landmarks::find(page.body_mut());

    let sidebar = async {
        if let Some(aside) = aside {
            mount_block(aside, "sidebar", ctx).await;
            ctx.record(LoadEvent::SidebarLoaded);
        }
    };
    let header = async {
        if let Some(header) = header {
            mount_block(header, "header", ctx).await;
            ctx.record(LoadEvent::HeaderLoaded);
        }
    };
    let footer = async {
        if let Some(footer) = footer {
            mount_block(footer, "footer", ctx).await;
            ctx.record(LoadEvent::FooterLoaded);
        }
    };
    tokio::join!(sidebar, header, footer);

    let config = ctx.config;
    load_css(page.head_mut(), &config.site.code_path(&config.load.lazy_styles));
    load_fonts(&mut page, ctx);

    ctx.record(LoadEvent::LazyDone);
    (page, scroll_target)
}

/// First `aside`, `header` and `footer` of the body, borrowed together.
#[derive(Default)]
struct Landmarks<'e> {
    aside: Option<&'e mut Element>,
    header: Option<&'e mut Element>,
    footer: Option<&'e mut Element>,
}

impl<'e> Landmarks<'e> {
    fn find(body: &'e mut Element) -> Self {
        let mut found = Self::default();
        found.collect(body);
        found
    }

    fn collect(&mut self, parent: &'e mut Element) {
        for child in &mut parent.children {
            let Node::Element(child) = child else {
                continue;
            };
            let slot = match child.tag.as_str() {
                "aside" => &mut self.aside,
                "header" => &mut self.header,
                "footer" => &mut self.footer,
                _ => {
                    self.collect(child);
                    continue;
                }
            };
            if slot.is_none() {
                *slot = Some(child);
            } else {
                self.collect(child);
            }
        }
    }
}

// ============================================================================
// resources
// ============================================================================

/// Insert `<link rel="stylesheet" href>` into `head` unless present.
///
/// Returns whether a link was added.
pub fn load_css(head: &mut Element, href: &str) -> bool {
    let present = head
        .element_children()
        .any(|e| e.tag == "link" && e.get_attr("rel") == Some("stylesheet") && e.get_attr("href") == Some(href));
    if !present {
        head.push(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", href),
        );
    }
    !present
}

/// Insert `<script type="module" src>` into `head` unless present.
fn load_script(head: &mut Element, src: &str) -> bool {
    let present = head
        .element_children()
        .any(|e| e.tag == "script" && e.get_attr("src") == Some(src));
    if !present {
        head.push(
            Element::new("script")
                .attr("type", "module")
                .attr("src", src),
        );
    }
    !present
}

/// Load the font stylesheet and remember it for the rest of the visit.
fn load_fonts(page: &mut Page, ctx: &LoadContext<'_>) {
    let href = ctx.config.site.code_path(&ctx.config.load.fonts);
    if load_css(page.head_mut(), &href) {
        ctx.record(LoadEvent::FontsLoaded);
    }
    if !ctx.url.is_localhost() {
        // unavailable storage only costs the next page an early font load
        let _ = ctx.session.set(FONTS_LOADED, "true");
    }
}
