//! `[site]` section configuration.
//!
//! Identity of the site and the paths the runtime reads from it.
//!
//! # Example
//!
//! ```toml
//! [site]
//! lang = "en"
//! code_base_path = ""                 # Prefix for /styles and /scripts
//! interior_template = "interior"      # Template value that gets a sidebar
//! banner_prefix = "City of Greeley"   # Category banner text prefix
//! query_index = "/query-index.json"
//! nav = "/nav"
//! footer = "/footer"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::types::ConfigDiagnostics;

/// Site identity and well-known paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Value written to `<html lang>`.
    pub lang: String,

    /// Prefix for stylesheet and script URLs.
    pub code_base_path: String,

    /// `template` metadata value that marks interior pages.
    pub interior_template: String,

    /// Text placed before the category in the category banner.
    pub banner_prefix: String,

    /// Site path of the query index.
    pub query_index: String,

    /// Default header fragment path (overridden by `nav` metadata).
    pub nav: String,

    /// Default footer fragment path (overridden by `footer` metadata).
    pub footer: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            lang: "en".into(),
            code_base_path: String::new(),
            interior_template: "interior".into(),
            banner_prefix: "City of Greeley".into(),
            query_index: "/query-index.json".into(),
            nav: "/nav".into(),
            footer: "/footer".into(),
        }
    }
}

impl SiteSectionConfig {
    /// Join a site path onto `code_base_path`.
    pub fn code_path(&self, path: &str) -> String {
        format!("{}{}", self.code_base_path.trim_end_matches('/'), path)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.interior_template.trim().is_empty() {
            diag.error("site.interior_template", "must not be empty");
        }
        if self.lang.trim().is_empty() {
            diag.error("site.lang", "must not be empty");
        }
        for (field, path) in [
            ("site.query_index", &self.query_index),
            ("site.nav", &self.nav),
            ("site.footer", &self.footer),
        ] {
            if !path.starts_with('/') {
                diag.error_with_hint(field, "must be a site path", format!("use \"/{path}\""));
            }
        }
    }
}
