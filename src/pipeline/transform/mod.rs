//! Page transforms.
//!
//! # Modules
//!
//! - `buttons`: Turns lone links into buttons
//! - `hero`: Synthesizes the hero block from a leading picture and `<h1>`
//! - `sections`: Wraps `main > div` content into decorated sections
//! - `blocks`: Marks block elements and builds new ones
//! - `structure`: Template classes, interior `aside`, category banner
//! - `layout`: Splits `data-layout` sections into two columns

mod blocks;
mod buttons;
mod hero;
mod layout;
mod sections;
mod structure;

pub use blocks::{BlockDecorator, build_block, decorate_block, read_block_config};
pub use buttons::ButtonDecorator;
pub use hero::AutoBlocks;
pub use layout::{Layout, LayoutError, SectionLayout};
pub use sections::{HIDDEN_STYLE, SECTION_STATUS, SectionDecorator};
pub use structure::{CategoryBanner, HtmlLang, TemplateAndTheme, TemplateStructure, to_class_name};
