//! Block loading and the per-block decorators.
//!
//! # Modules
//!
//! - `sidebar`: Fills the interior `aside` from the section's sidebar fragment
//! - `query_list`: Renders query index entries of one category
//! - `chrome`: Header and footer from the `nav` / `footer` fragments
//! - `fragment`: Loads, decorates and section-loads a fragment
//!
//! Block status moves `initialized → loading → loaded` exactly once. A
//! decorator failure is logged and leaves the block as it was; the rest of
//! the page keeps loading.

mod chrome;
mod fragment;
mod query_list;
mod sidebar;

pub use fragment::load_fragment;
pub use query_list::QueryListConfig;
pub use sidebar::sidebar_path;

use thiserror::Error;

use crate::dom::{Element, Node};
use crate::loader::LoadContext;
use crate::pipeline::{build_block, decorate_block};
use crate::{debug, log};

pub const BLOCK_STATUS: &str = "data-block-status";

/// Block decoration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// The authored block markup does not describe a valid configuration.
    #[error("invalid `{block}` configuration: {message}")]
    Config { block: &'static str, message: String },
}

impl BlockError {
    pub fn config(block: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            block,
            message: message.into(),
        }
    }
}

/// A block addressed through its parent, so decorators can replace it or
/// touch the wrapper.
pub struct BlockSlot<'a> {
    pub parent: &'a mut Element,
    pub index: usize,
}

impl<'a> BlockSlot<'a> {
    pub fn new(parent: &'a mut Element, index: usize) -> Self {
        Self { parent, index }
    }

    pub fn block(&self) -> Option<&Element> {
        self.parent.children.get(self.index)?.as_element()
    }

    pub fn block_mut(&mut self) -> Option<&mut Element> {
        self.parent.children.get_mut(self.index)?.as_element_mut()
    }

    /// Replace the block with `nodes`.
    pub fn replace_with(&mut self, nodes: Vec<Node>) {
        if self.index < self.parent.children.len() {
            self.parent.children.splice(self.index..=self.index, nodes);
        }
    }
}

/// Load one block: run its decorator once.
pub async fn load_block(mut slot: BlockSlot<'_>, ctx: &LoadContext<'_>) {
    let Some(block) = slot.block_mut() else {
        return;
    };
    if matches!(block.get_attr(BLOCK_STATUS), Some("loading" | "loaded")) {
        return;
    }
    block.set_attr(BLOCK_STATUS, "loading");
    let name = block
        .get_attr("data-block-name")
        .or_else(|| block.first_class())
        .unwrap_or_default()
        .to_string();

    let result = match name.as_str() {
        "sidebar" => sidebar::decorate(&mut slot, ctx).await,
        "query-list" => query_list::decorate(&mut slot, ctx).await,
        "header" => chrome::decorate_header(&mut slot, ctx).await,
        "footer" => chrome::decorate_footer(&mut slot, ctx).await,
        _ => {
            debug!("lazy"; "no decorator for `{name}` block");
            Ok(())
        }
    };
    if let Err(e) = result {
        log!("error"; "failed to load `{name}` block: {e}");
    }

    if let Some(block) = slot.block_mut()
        && block.get_attr(BLOCK_STATUS) == Some("loading")
    {
        block.set_attr(BLOCK_STATUS, "loaded");
    }
}

/// Append an empty `name` block to `host` (a page landmark such as
/// `header` or `aside`) and load it.
pub async fn mount_block(host: &mut Element, name: &str, ctx: &LoadContext<'_>) {
    let mut block = build_block(name, vec![vec![vec![]]]);
    if decorate_block(&mut block).is_some() {
        host.add_class(&format!("{name}-wrapper"));
    }
    host.push(block);
    let index = host.children.len() - 1;
    load_block(BlockSlot::new(host, index), ctx).await;
}
