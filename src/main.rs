//! Greeley site - block decoration pipeline and legacy page importer.

mod blocks;
mod cli;
mod config;
mod dom;
mod importer;
mod loader;
mod logger;
mod page;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    init_config(SiteConfig::load(&cli)?);
    let config = cfg();

    match &cli.command {
        Commands::Decorate { args } => cli::decorate::run_decorate(args, &config),
        Commands::Import { args } => cli::import::run_import(args, &config),
        Commands::Path { url } => {
            println!("{}", importer::generate_document_path(url)?);
            Ok(())
        }
    }
}
