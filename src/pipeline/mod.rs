//! Page decoration pipeline.
//!
//! Every synchronous decoration step is a [`Transform`] that consumes a
//! [`Page`] and returns it, so steps compose left to right:
//!
//! ```text
//! Page ─▶ ButtonDecorator ─▶ AutoBlocks ─▶ SectionDecorator
//!      ─▶ TemplateStructure ─▶ BlockDecorator ─▶ SectionLayout ─▶ Page
//! ```
//!
//! The asynchronous parts of page loading (blocks that read fragments or the
//! query index, timers) live in `loader`; this module never suspends.

pub mod transform;

use crate::config::SiteConfig;
use crate::page::Page;

pub use transform::{
    AutoBlocks, BlockDecorator, ButtonDecorator, CategoryBanner, HIDDEN_STYLE, HtmlLang,
    SECTION_STATUS, SectionDecorator, SectionLayout, TemplateAndTheme, TemplateStructure,
    build_block, decorate_block, read_block_config, to_class_name,
};

/// A single page-to-page decoration step.
pub trait Transform {
    fn transform(self, page: Page) -> Page;
}

/// Left-to-right composition of transforms over one page value.
pub struct Pipeline {
    page: Page,
}

impl Pipeline {
    #[inline]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Apply a transform.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            page: transform.transform(self.page),
        }
    }

    /// Apply a transform only when `cond` holds.
    #[inline]
    pub fn pipe_if<T: Transform>(self, cond: bool, transform: T) -> Self {
        if cond { self.pipe(transform) } else { self }
    }

    /// Look at the intermediate page without changing it.
    #[inline]
    pub fn inspect(self, f: impl FnOnce(&Page)) -> Self {
        f(&self.page);
        self
    }

    #[inline]
    pub fn into_inner(self) -> Page {
        self.page
    }
}

/// Decorate `main`: buttons, auto blocks, sections, template structure,
/// blocks and section layout, in that order.
///
/// Used for the page itself in the eager phase and for every loaded
/// fragment.
pub fn decorate_main(page: Page, config: &SiteConfig) -> Page {
    Pipeline::new(page)
        .pipe(ButtonDecorator)
        .pipe(AutoBlocks)
        .pipe(SectionDecorator)
        .pipe(TemplateStructure::new(config))
        .pipe(BlockDecorator)
        .pipe(SectionLayout)
        .into_inner()
}
