//! State scoped to one page load.

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use super::{QueryIndex, Session, Source};
use crate::config::SiteConfig;
use crate::debug;
use crate::page::{Metadata, Page, PageUrl};

/// What happened during a page load, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    EagerStarted,
    FirstImage(ImageWait),
    EagerDone,
    FontsLoaded,
    LazyStarted,
    SectionsLoaded,
    SidebarLoaded,
    HeaderLoaded,
    FooterLoaded,
    LazyDone,
    DelayedDone,
}

/// Outcome of waiting for the first section's first image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageWait {
    /// The section has no image.
    NoImage,
    /// The image is hosted elsewhere; nothing to wait for.
    External,
    Loaded,
    /// The image errored (not in the source).
    Missing,
    /// The wait hit `load.image_wait_ms`.
    TimedOut,
}

/// Observable result of a page load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub events: Vec<LoadEvent>,
    /// Element id the page scrolls to, when the URL hash names one.
    pub scroll_target: Option<String>,
}

impl LoadReport {
    /// Position of the first occurrence of `event`.
    pub fn position(&self, event: &LoadEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

/// Everything a page load reads from, plus its page-scoped caches.
pub struct LoadContext<'a> {
    pub config: &'a SiteConfig,
    pub source: &'a Source,
    pub session: &'a Session,
    pub url: PageUrl,
    /// Metadata snapshot of the page being loaded.
    pub meta: Metadata,
    /// Viewport width in CSS pixels.
    pub viewport: u32,
    index: OnceCell<QueryIndex>,
    events: Mutex<Vec<LoadEvent>>,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        config: &'a SiteConfig,
        source: &'a Source,
        session: &'a Session,
        url: PageUrl,
        meta: Metadata,
    ) -> Self {
        Self {
            config,
            source,
            session,
            url,
            meta,
            viewport: 1200,
            index: OnceCell::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Context for loading `page`: its location and a metadata snapshot.
    pub fn for_page(config: &'a SiteConfig, source: &'a Source, session: &'a Session, page: &Page) -> Self {
        Self::new(config, source, session, page.url.clone(), page.metadata().clone())
    }

    /// Builder: set the viewport width.
    pub const fn with_viewport(mut self, viewport: u32) -> Self {
        self.viewport = viewport;
        self
    }

    /// The query index, fetched on first use and shared afterwards.
    ///
    /// A missing or malformed index reads as empty.
    pub async fn query_index(&self) -> &QueryIndex {
        self.index
            .get_or_init(|| async {
                let path = &self.config.site.query_index;
                let Some(json) = self.source.read(path).await else {
                    return QueryIndex::default();
                };
                QueryIndex::parse(&json).unwrap_or_else(|e| {
                    debug!("lazy"; "ignoring malformed query index {path}: {e}");
                    QueryIndex::default()
                })
            })
            .await
    }

    pub fn record(&self, event: LoadEvent) {
        self.events.lock().push(event);
    }

    pub(super) fn take_events(&self) -> Vec<LoadEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}
