//! Query index: the site-wide list of published pages.
//!
//! Accepted shapes:
//!
//! ```json
//! [{"path": "/news/a", "category": "News", ...}]
//! {"total": 1, "offset": 0, "limit": 1, "data": [{"path": "/news/a", ...}]}
//! ```
//!
//! Missing or `null` fields read as empty strings. `pubdate` is either text
//! or an Excel serial day number; any other value reads as text, so one odd
//! record never rejects the whole index.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::utils::date::convert_excel_date;

/// One published page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub path: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    pub pubdate: PubDate,
}

/// Publish date as stored in the index.
#[derive(Debug, Clone, PartialEq)]
pub enum PubDate {
    Serial(f64),
    Text(String),
}

impl Default for PubDate {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for PubDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::Number(n) => match n.as_f64() {
                Some(serial) => Self::Serial(serial),
                None => Self::Text(n.to_string()),
            },
            JsonValue::Null => Self::default(),
            JsonValue::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        })
    }
}

impl PubDate {
    /// Human-readable date (`"Thu Mar 16 2023"` for serials).
    pub fn display(&self) -> String {
        match self {
            Self::Serial(serial) => {
                convert_excel_date(*serial).unwrap_or_else(|| serial.to_string())
            }
            Self::Text(text) => text.clone(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Sheet { data: Vec<IndexEntry> },
    Bare(Vec<IndexEntry>),
}

/// Parsed query index, in published order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryIndex {
    entries: Vec<IndexEntry>,
}

impl QueryIndex {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let entries = match serde_json::from_str(json)? {
            Envelope::Sheet { data } => data,
            Envelope::Bare(entries) => entries,
        };
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entries whose category contains `token`, in index order.
    pub fn in_category<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a IndexEntry> {
        self.entries.iter().filter(move |e| e.category.contains(token))
    }
}

impl From<Vec<IndexEntry>> for QueryIndex {
    fn from(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }
}
