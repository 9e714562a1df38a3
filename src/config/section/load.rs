//! `[load]` section configuration.
//!
//! Timing and resource settings for the eager / lazy / delayed phases.
//!
//! # Example
//!
//! ```toml
//! [load]
//! font_breakpoint = 900       # Viewport width that loads fonts eagerly
//! image_wait_ms = 3000        # Cap on the first-image wait
//! fetch_timeout_ms = 10000    # Cap on every fragment / index read
//! delayed_ms = 3000           # Delay before the deferred script
//! fonts = "/styles/fonts.css"
//! lazy_styles = "/styles/lazy-styles.css"
//! delayed_script = "/scripts/delayed.js"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::types::ConfigDiagnostics;

/// Page load phase settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadSectionConfig {
    /// Minimum viewport width (px) that loads fonts in the eager phase.
    pub font_breakpoint: u32,

    /// Longest wait for the first section's first image.
    pub image_wait_ms: u64,

    /// Longest wait for any single content-source read.
    pub fetch_timeout_ms: u64,

    /// Delay between lazy completion and the deferred script.
    pub delayed_ms: u64,

    /// Font stylesheet path (under `site.code_base_path`).
    pub fonts: String,

    /// Secondary stylesheet loaded in the lazy phase.
    pub lazy_styles: String,

    /// Module script inserted by the delayed phase.
    pub delayed_script: String,
}

impl Default for LoadSectionConfig {
    fn default() -> Self {
        Self {
            font_breakpoint: 900,
            image_wait_ms: 3000,
            fetch_timeout_ms: 10_000,
            delayed_ms: 3000,
            fonts: "/styles/fonts.css".into(),
            lazy_styles: "/styles/lazy-styles.css".into(),
            delayed_script: "/scripts/delayed.js".into(),
        }
    }
}

impl LoadSectionConfig {
    #[inline]
    pub const fn image_wait(&self) -> Duration {
        Duration::from_millis(self.image_wait_ms)
    }

    #[inline]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    #[inline]
    pub const fn delayed(&self) -> Duration {
        Duration::from_millis(self.delayed_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.font_breakpoint == 0 {
            diag.error("load.font_breakpoint", "must be greater than 0");
        }
        if self.fetch_timeout_ms == 0 {
            diag.error_with_hint(
                "load.fetch_timeout_ms",
                "must be greater than 0",
                "every read would time out immediately",
            );
        }
    }
}
