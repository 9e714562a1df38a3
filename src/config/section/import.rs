//! `[import]` section configuration.
//!
//! Rules for migrating legacy pages.
//!
//! # Example
//!
//! ```toml
//! [import]
//! remove = ["header", "nav", "footer", ".side-content"]
//! category = "News"
//! pubdate_selector = ".sfitemDate"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::types::ConfigDiagnostics;

/// Legacy page import rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportSectionConfig {
    /// Selectors removed from the legacy body before conversion.
    pub remove: Vec<String>,

    /// `Category` written into every metadata block.
    pub category: String,

    /// Element whose text is the publish date.
    pub pubdate_selector: String,
}

impl Default for ImportSectionConfig {
    fn default() -> Self {
        Self {
            remove: [
                "header",
                ".header",
                "nav",
                ".nav",
                "footer",
                ".footer",
                ".ggov-footer",
                "iframe",
                "noscript",
                ".breadcrumb-row",
                ".visually-hidden",
                "h1",
                ".side-content",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            category: "News".into(),
            pubdate_selector: ".sfitemDate".into(),
        }
    }
}

impl ImportSectionConfig {
    /// All removal selectors as one selector list.
    pub fn remove_selector(&self) -> String {
        self.remove.join(", ")
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.remove.iter().any(|s| s.contains(',')) {
            diag.error_with_hint(
                "import.remove",
                "entries must be single selectors",
                "split comma lists into separate entries",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_import_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.import.category, "News");
        assert!(config.import.remove.iter().any(|s| s == ".side-content"));
        assert!(config.import.remove_selector().starts_with("header, .header"));
    }

    #[test]
    fn test_import_remove_override() {
        let config = test_parse_config("[import]\nremove = [\"aside\"]");
        assert_eq!(config.import.remove, vec!["aside".to_string()]);
    }
}
