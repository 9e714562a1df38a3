//! Destination path of an imported page.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::ImportError;

static NON_PATH_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9/]").unwrap());

/// Content path for a legacy page URL.
///
/// ```text
/// https://x.com/News/Story One!.html  →  /news/story-one-
/// https://x.com/departments/          →  /departments/index
/// ```
pub fn generate_document_path(url: &str) -> Result<String, ImportError> {
    let url = url::Url::parse(url).map_err(|source| ImportError::Url {
        url: url.to_string(),
        source,
    })?;

    let mut path = url.path().to_string();
    if path.ends_with('/') {
        path.push_str("index");
    }
    let decoded = percent_decode_str(&path).decode_utf8_lossy().to_lowercase();
    let stripped = decoded.strip_suffix(".html").unwrap_or(&decoded);

    Ok(NON_PATH_CHARS.replace_all(stripped, "-").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path() {
        assert_eq!(
            generate_document_path("https://x.com/News/Story One!.html").unwrap(),
            "/news/story-one-"
        );
        assert_eq!(
            generate_document_path("https://x.com/departments/").unwrap(),
            "/departments/index"
        );
        assert_eq!(generate_document_path("https://x.com").unwrap(), "/index");
    }

    #[test]
    fn test_document_path_decodes_before_replacing() {
        assert_eq!(
            generate_document_path("https://x.com/city%20council/Agenda_2024.HTML").unwrap(),
            "/city-council/agenda-2024"
        );
        assert_eq!(
            generate_document_path("https://x.com/a.html/b.html?x=1#top").unwrap(),
            "/a-html/b"
        );
    }

    #[test]
    fn test_document_path_rejects_relative() {
        assert!(matches!(
            generate_document_path("/news/story"),
            Err(ImportError::Url { .. })
        ));
    }
}
