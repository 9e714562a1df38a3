//! Process-wide config handle.
//!
//! Uses `arc-swap` for lock-free reads. The config is installed once at
//! startup; command code reads it through `cfg()`.

use crate::config::SiteConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_replaces_global() {
        let mut config = SiteConfig::default();
        config.site.banner_prefix = "Town of Test".into();
        let installed = init_config(config);
        assert_eq!(installed.site.banner_prefix, "Town of Test");
        assert_eq!(cfg().site.banner_prefix, "Town of Test");
        init_config(SiteConfig::default());
    }
}
