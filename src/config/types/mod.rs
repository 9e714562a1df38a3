//! Configuration utility types.
//!
//! | Module   | Purpose                                   |
//! |----------|-------------------------------------------|
//! | `error`  | Configuration error and diagnostics types |
//! | `handle` | Global configuration handle               |

mod error;
pub mod handle;

pub use error::{ConfigDiagnostics, ConfigError};
pub use handle::{cfg, init_config};
