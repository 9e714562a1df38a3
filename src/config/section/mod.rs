//! Configuration section definitions.
//!
//! Each module corresponds to a section in `site.toml`:
//!
//! | Module   | TOML Section | Purpose                                 |
//! |----------|--------------|-----------------------------------------|
//! | `site`   | `[site]`     | Language, templates, well-known paths   |
//! | `load`   | `[load]`     | Phase timings and phase resources       |
//! | `import` | `[import]`   | Legacy page migration rules             |

mod import;
mod load;
mod site;

pub use import::ImportSectionConfig;
pub use load::LoadSectionConfig;
pub use site::SiteSectionConfig;
