//! Page metadata from `<meta>` tags.
//!
//! Keys containing a colon (`og:image`) are looked up by `property`, all
//! others by `name`. Repeated tags are joined with `", "`.

use rustc_hash::FxHashMap;

use crate::dom::{Element, Selector};

/// Snapshot of the document's declared metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    by_name: FxHashMap<String, String>,
    by_property: FxHashMap<String, String>,
}

impl Metadata {
    /// Read every `<meta>` under `head`.
    pub fn from_head(head: &Element) -> Self {
        let mut meta = Self::default();
        for tag in head.find_all(&Selector::tag("meta")) {
            let content = tag.get_attr("content").unwrap_or_default();
            if let Some(name) = tag.get_attr("name") {
                Self::append(&mut meta.by_name, name, content);
            }
            if let Some(property) = tag.get_attr("property") {
                Self::append(&mut meta.by_property, property, content);
            }
        }
        meta
    }

    fn append(map: &mut FxHashMap<String, String>, key: &str, content: &str) {
        map.entry(key.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(content);
            })
            .or_insert_with(|| content.to_string());
    }

    /// Value for `key`, or `None` when no such tag exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        let map = if key.contains(':') {
            &self.by_property
        } else {
            &self.by_name
        };
        map.get(key).map(String::as_str)
    }

    /// Whether `key` is present and equals `value`.
    pub fn is(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Insert or replace a `name` entry.
    pub fn insert(&mut self, key: &str, value: &str) {
        let map = if key.contains(':') {
            &mut self.by_property
        } else {
            &mut self.by_name
        };
        map.insert(key.to_string(), value.to_string());
    }
}
