//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Greeley site page decorator and legacy content importer
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: site.toml)
    #[arg(short = 'C', long, global = true, default_value = "site.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the page load lifecycle over server-rendered pages
    #[command(visible_alias = "d")]
    Decorate {
        #[command(flatten)]
        args: DecorateArgs,
    },

    /// Convert legacy HTML pages into Markdown content
    #[command(visible_alias = "i")]
    Import {
        #[command(flatten)]
        args: ImportArgs,
    },

    /// Print the content path a legacy URL imports to
    #[command(visible_alias = "p")]
    Path {
        /// Legacy page URL
        #[arg(value_hint = clap::ValueHint::Url)]
        url: String,
    },
}

/// Decorate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct DecorateArgs {
    /// Pages to decorate (paths under the site root)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Directory that fragments and the query index are read from
    /// (default: the directory holding the config file)
    #[arg(short = 'r', long, value_hint = clap::ValueHint::DirPath)]
    pub site_root: Option<PathBuf>,

    /// Origin the pages are served from; page URLs are joined onto it
    #[arg(short = 'U', long, default_value = "http://localhost:3000/", value_hint = clap::ValueHint::Url)]
    pub url_base: String,

    /// In-page anchor to load the pages with (without `#`)
    #[arg(long)]
    pub hash: Option<String>,

    /// Viewport width used for the eager font decision
    #[arg(short = 'w', long, default_value_t = 1200)]
    pub viewport: u32,

    /// Output directory for decorated pages
    #[arg(short, long, default_value = "decorated", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Override `load.fetch_timeout_ms`
    #[arg(long, value_name = "MS")]
    pub fetch_timeout: Option<u64>,

    /// Fire the delayed phase without waiting (`load.delayed_ms = 0`)
    #[arg(long)]
    pub no_delay: bool,

    /// Drop the delayed phase instead of waiting for it
    #[arg(long)]
    pub skip_delayed: bool,
}

/// Import command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// Legacy HTML file to import
    #[arg(value_hint = clap::ValueHint::FilePath, conflicts_with = "dir", required_unless_present = "dir")]
    pub file: Option<PathBuf>,

    /// URL the file was served from
    #[arg(short, long, requires = "file", value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,

    /// Import every `*.html` file under this directory
    #[arg(short, long, requires = "base_url", value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// URL the directory was served from
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Output directory for Markdown files
    #[arg(short, long, default_value = "content", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,
}

#[allow(unused)]
impl Cli {
    pub const fn is_decorate(&self) -> bool {
        matches!(self.command, Commands::Decorate { .. })
    }
    pub const fn is_import(&self) -> bool {
        matches!(self.command, Commands::Import { .. })
    }
}
