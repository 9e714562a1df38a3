//! Page location.
//!
//! Wraps `url::Url` and exposes the parts the load pipeline reads, the way
//! the browser's `window.location` would.

use std::fmt;

/// Location of the page being decorated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl(url::Url);

impl PageUrl {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        url::Url::parse(input).map(Self)
    }

    /// Location for a site-relative path on a placeholder origin.
    ///
    /// Used for fragments and tests where only the path matters.
    pub fn from_path(path: &str) -> Self {
        static BASE: std::sync::OnceLock<url::Url> = std::sync::OnceLock::new();
        let base = BASE.get_or_init(|| url::Url::parse("http://localhost/").unwrap());
        Self(base.join(path).unwrap_or_else(|_| base.clone()))
    }

    /// Percent-encoded path, like `location.pathname`.
    #[inline]
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Fragment without the leading `#`, if non-empty.
    pub fn hash(&self) -> Option<&str> {
        self.0.fragment().filter(|f| !f.is_empty())
    }

    pub fn hostname(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    pub fn is_localhost(&self) -> bool {
        self.hostname().contains("localhost")
    }

    /// Resolve a possibly relative reference against this location.
    pub fn resolve(&self, href: &str) -> Option<url::Url> {
        self.0.join(href).ok()
    }

    /// Site-relative form of `href` when it points at this origin.
    pub fn site_path(&self, href: &str) -> Option<String> {
        let resolved = self.resolve(href)?;
        (resolved.origin() == self.0.origin()).then(|| resolved.path().to_string())
    }

    pub fn as_url(&self) -> &url::Url {
        &self.0
    }
}

impl From<url::Url> for PageUrl {
    fn from(url: url::Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_hash() {
        let url = PageUrl::parse("https://www.greeleygov.com/services/parks/trails#map").unwrap();
        assert_eq!(url.path(), "/services/parks/trails");
        assert_eq!(url.hash(), Some("map"));
        assert!(!url.is_localhost());
    }

    #[test]
    fn test_empty_hash_is_none() {
        let url = PageUrl::parse("https://x.com/a#").unwrap();
        assert_eq!(url.hash(), None);
    }

    #[test]
    fn test_from_path_is_localhost() {
        let url = PageUrl::from_path("/a/b/c");
        assert_eq!(url.path(), "/a/b/c");
        assert!(url.is_localhost());
    }

    #[test]
    fn test_site_path_same_origin_only() {
        let url = PageUrl::parse("https://x.com/news/").unwrap();
        assert_eq!(url.site_path("/nav").as_deref(), Some("/nav"));
        assert_eq!(url.site_path("https://x.com/footer").as_deref(), Some("/footer"));
        assert_eq!(url.site_path("https://other.com/nav"), None);
    }
}
