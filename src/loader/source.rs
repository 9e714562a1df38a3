//! Content source: where fragments, the query index and images are read from.
//!
//! Two backends:
//! - `Dir`: files under a site root on disk (`tokio::fs`)
//! - `Memory`: an in-memory path → body map, with optional per-path latency
//!
//! Every read is bounded by `load.fetch_timeout_ms`; a read that times out is
//! reported as missing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;

use crate::debug;

enum Backend {
    Dir(PathBuf),
    Memory {
        files: FxHashMap<String, String>,
        latency: FxHashMap<String, Duration>,
    },
}

/// Read-only view of the published site.
pub struct Source {
    backend: Backend,
    timeout: Duration,
    reads: Mutex<Vec<String>>,
}

impl Source {
    /// Source backed by a directory.
    pub fn dir(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self::with_backend(Backend::Dir(root.into()), timeout)
    }

    /// Empty in-memory source.
    pub fn memory(timeout: Duration) -> Self {
        Self::with_backend(
            Backend::Memory {
                files: FxHashMap::default(),
                latency: FxHashMap::default(),
            },
            timeout,
        )
    }

    fn with_backend(backend: Backend, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Builder: add an in-memory file. No-op for directory sources.
    pub fn with_file(mut self, path: &str, body: impl Into<String>) -> Self {
        if let Backend::Memory { files, .. } = &mut self.backend {
            files.insert(path.to_string(), body.into());
        }
        self
    }

    /// Builder: delay every read of `path` by `delay`. No-op for directory
    /// sources.
    pub fn with_latency(mut self, path: &str, delay: Duration) -> Self {
        if let Backend::Memory { latency, .. } = &mut self.backend {
            latency.insert(path.to_string(), delay);
        }
        self
    }

    /// Paths requested so far, in request order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().clone()
    }

    /// Read a site path (`/a/b.html`). `None` when missing, unreadable,
    /// outside the site, or slower than the fetch timeout.
    pub async fn read(&self, path: &str) -> Option<String> {
        if !is_site_path(path) {
            debug!("source"; "rejected path {path}");
            return None;
        }
        self.reads.lock().push(path.to_string());

        match tokio::time::timeout(self.timeout, self.read_backend(path)).await {
            Ok(found) => {
                if found.is_none() {
                    debug!("source"; "{path} not found");
                }
                found
            }
            Err(_) => {
                debug!("source"; "{path} timed out after {:?}", self.timeout);
                None
            }
        }
    }

    /// Whether a site path exists (used for image availability).
    pub async fn is_available(&self, path: &str) -> bool {
        if !is_site_path(path) {
            return false;
        }
        let exists = async {
            match &self.backend {
                Backend::Dir(root) => tokio::fs::metadata(resolve(root, path))
                    .await
                    .is_ok_and(|m| m.is_file()),
                Backend::Memory { files, latency } => {
                    if let Some(delay) = latency.get(path) {
                        tokio::time::sleep(*delay).await;
                    }
                    files.contains_key(path)
                }
            }
        };
        tokio::time::timeout(self.timeout, exists)
            .await
            .unwrap_or(false)
    }

    /// Fragment markup for `path`: tries `<path>.plain.html`, `<path>.html`,
    /// then `<path>/index.html`.
    pub async fn fragment(&self, path: &str) -> Option<String> {
        let base = path.trim_end_matches('/');
        let base = base
            .strip_suffix(".html")
            .map(|b| b.strip_suffix(".plain").unwrap_or(b))
            .unwrap_or(base);

        for candidate in [
            format!("{base}.plain.html"),
            format!("{base}.html"),
            format!("{base}/index.html"),
        ] {
            if let Some(body) = self.read(&candidate).await {
                return Some(body);
            }
        }
        None
    }

    async fn read_backend(&self, path: &str) -> Option<String> {
        match &self.backend {
            Backend::Dir(root) => tokio::fs::read_to_string(resolve(root, path)).await.ok(),
            Backend::Memory { files, latency } => {
                if let Some(delay) = latency.get(path) {
                    tokio::time::sleep(*delay).await;
                }
                files.get(path).cloned()
            }
        }
    }
}

/// Absolute and free of `..` segments.
fn is_site_path(path: &str) -> bool {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    path.starts_with('/') && !decoded.split(['/', '\\']).any(|seg| seg == "..")
}

/// File for a site path; `%20` and friends are decoded like a web server would.
fn resolve(root: &Path, path: &str) -> PathBuf {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    root.join(decoded.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_dir_fragment_fallbacks() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("parks/sidebar")).unwrap();
        fs::write(dir.path().join("nav.plain.html"), "<p>nav</p>").unwrap();
        fs::write(dir.path().join("footer.html"), "<p>footer</p>").unwrap();
        fs::write(dir.path().join("parks/sidebar/index.html"), "<p>side</p>").unwrap();

        let source = Source::dir(dir.path(), TIMEOUT);
        assert_eq!(source.fragment("/nav").await.as_deref(), Some("<p>nav</p>"));
        assert_eq!(source.fragment("/footer").await.as_deref(), Some("<p>footer</p>"));
        assert_eq!(source.fragment("/parks/sidebar").await.as_deref(), Some("<p>side</p>"));
        assert_eq!(source.fragment("/missing").await, None);
    }

    #[tokio::test]
    async fn test_fragment_strips_html_suffix() {
        let source = Source::memory(TIMEOUT).with_file("/nav.plain.html", "x");
        assert!(source.fragment("/nav.plain.html").await.is_some());
        assert!(source.fragment("/nav.html").await.is_some());
        assert_eq!(source.reads(), ["/nav.plain.html", "/nav.plain.html"]);
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let source = Source::memory(TIMEOUT).with_file("/../secret", "x");
        assert_eq!(source.read("/../secret").await, None);
        assert_eq!(source.read("relative").await, None);
        assert_eq!(source.read("/%2e%2e/secret").await, None);
        assert!(source.reads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_read_times_out() {
        let source = Source::memory(Duration::from_millis(100))
            .with_file("/slow.plain.html", "late")
            .with_latency("/slow.plain.html", Duration::from_secs(60));
        let started = tokio::time::Instant::now();
        assert_eq!(source.read("/slow.plain.html").await, None);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_dir_decodes_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("city hall.plain.html"), "<p>hall</p>").unwrap();
        let source = Source::dir(dir.path(), TIMEOUT);
        assert_eq!(source.fragment("/city%20hall").await.as_deref(), Some("<p>hall</p>"));
    }

    #[tokio::test]
    async fn test_is_available() {
        let source = Source::memory(TIMEOUT).with_file("/media/hero.jpg", "");
        assert!(source.is_available("/media/hero.jpg").await);
        assert!(!source.is_available("/media/other.jpg").await);
    }
}
