//! `import` command: legacy HTML → Markdown content.
//!
//! A single file needs the URL it was served from. A directory is walked
//! for `*.html` files, which are imported in parallel; each file's URL is
//! the base URL joined with its path relative to the directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::cli::ImportArgs;
use crate::config::SiteConfig;
use crate::importer::import_file;
use crate::logger::ProgressLine;
use crate::{debug, log};

/// Run the import command.
pub fn run_import(args: &ImportArgs, config: &SiteConfig) -> Result<()> {
    match (&args.file, &args.dir) {
        (Some(file), _) => {
            let Some(url) = &args.url else {
                bail!("importing a single file needs --url");
            };
            import_one(file, url, &args.output, config)
        }
        (None, Some(dir)) => {
            let base_url = args.base_url.as_deref().context("--dir needs --base-url")?;
            import_dir(dir, base_url, &args.output, config)
        }
        (None, None) => bail!("nothing to import: pass a file or --dir"),
    }
}

fn import_one(file: &Path, url: &str, output: &Path, config: &SiteConfig) -> Result<()> {
    let imported = import_file(file, url, &config.import)?;
    let written = imported.write(output)?;
    log!("import"; "{} -> {}", file.display(), written.display());
    Ok(())
}

fn import_dir(dir: &Path, base_url: &str, output: &Path, config: &SiteConfig) -> Result<()> {
    let base = directory_url(base_url)?;
    let files = collect_html_files(dir);
    if files.is_empty() {
        log!("import"; "no html files under {}", dir.display());
        return Ok(());
    }

    let total = files.len();
    let progress = ProgressLine::new("import", &[("pages", total), ("failed", total)]);

    let failed: usize = files
        .par_iter()
        .map(|file| {
            let result = file_url(&base, dir, file).and_then(|url| {
                let imported = import_file(file, url.as_str(), &config.import)?;
                Ok(imported.write(output)?)
            });
            match result {
                Ok(written) => {
                    debug!("import"; "{} -> {}", file.display(), written.display());
                    progress.inc("pages");
                    0
                }
                Err(e) => {
                    log!("error"; "{}: {:#}", file.display(), e);
                    progress.inc("failed");
                    1
                }
            }
        })
        .sum();
    progress.finish();

    if failed > 0 {
        bail!("{failed} of {total} pages failed to import");
    }
    log!("import"; "{total} pages written to {}", output.display());
    Ok(())
}

/// Base URL with a trailing slash, so relative paths join under it.
fn directory_url(base_url: &str) -> Result<url::Url> {
    let mut base = url::Url::parse(base_url).with_context(|| format!("invalid --base-url `{base_url}`"))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn file_url(base: &url::Url, dir: &Path, file: &Path) -> Result<url::Url> {
    let relative = file.strip_prefix(dir).unwrap_or(file);
    let path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    base.join(&path)
        .with_context(|| format!("cannot join `{path}` onto {base}"))
}

fn collect_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("html")))
        .collect();
    files.sort();
    files
}
