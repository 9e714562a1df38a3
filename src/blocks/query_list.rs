//! `query-list` block: cards for the index entries of one category.
//!
//! Authored as a single row of two cells, the category token and the
//! maximum number of cards:
//!
//! ```text
//! | query-list       |
//! | News      | 3    |
//! ```

use super::{BlockError, BlockSlot};
use crate::dom::Element;
use crate::loader::{IndexEntry, LoadContext, QueryIndex};

const BLOCK: &str = "query-list";

/// Parsed block configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryListConfig {
    /// Substring an entry's `category` must contain.
    pub filter_token: String,
    /// Upper bound on rendered cards.
    pub limit: usize,
}

impl QueryListConfig {
    /// Read the first row: first cell is the token, last cell the limit.
    pub fn from_block(block: &Element) -> Result<Self, BlockError> {
        let row = block
            .first_element_child()
            .ok_or_else(|| BlockError::config(BLOCK, "missing configuration row"))?;
        let (Some(first), Some(last)) = (row.first_element_child(), row.last_element_child())
        else {
            return Err(BlockError::config(BLOCK, "configuration row has no cells"));
        };

        let filter_token = first.text_content().trim().to_string();
        let limit_text = last.text_content();
        let limit = limit_text.trim().parse::<i64>().map_err(|_| {
            BlockError::config(BLOCK, format!("limit `{}` is not a number", limit_text.trim()))
        })?;
        // a negative limit is authored, not broken: it lists nothing
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(Self {
            filter_token,
            limit,
        })
    }

    /// Matching entries in index order, at most `limit` of them.
    ///
    /// The limit counts positions in the filtered list, which is the same as
    /// counting rendered cards since every entry is rendered once.
    pub fn select<'a>(&'a self, index: &'a QueryIndex) -> impl Iterator<Item = &'a IndexEntry> {
        index.in_category(&self.filter_token).take(self.limit)
    }

    /// Render the card list.
    pub fn render(&self, index: &QueryIndex) -> Element {
        let mut list = Element::new("ul").attr("id", "list");
        for entry in self.select(index) {
            list.push(Element::new("li").child(card(entry)));
        }
        list
    }
}

fn card(entry: &IndexEntry) -> Element {
    let mut description = Element::new("p").class("description");
    description.set_text(&entry.description);
    let mut date = Element::new("span");
    date.set_text(&entry.pubdate.display());

    Element::new("a")
        .attr("href", &entry.path)
        .child(Element::new("img").attr("src", &entry.image))
        .child(Element::new("h3").class("title").text(entry.title.as_str()))
        .child(description)
        .child(date)
}

pub(super) async fn decorate(slot: &mut BlockSlot<'_>, ctx: &LoadContext<'_>) -> Result<(), BlockError> {
    let Some(block) = slot.block() else {
        return Ok(());
    };
    let config = QueryListConfig::from_block(block)?;
    let list = config.render(ctx.query_index().await);

    if let Some(block) = slot.block_mut() {
        block.children.clear();
        block.push(list);
    }
    Ok(())
}
