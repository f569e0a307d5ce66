//! URL manipulation utilities.
//!
//! Pure helpers for building search URLs, resolving listing hrefs and
//! rewriting media URLs between resolution variants.

use url::Url;

use crate::errors::{ScrapeError, ScrapeResult};

use super::constants::{
    HIGH_RES_PATH, MEDIUM_RES_PATH, ORIGINALS_SEGMENT, SEARCH_PATH, THUMBNAIL_SEGMENT,
};

/// Build the pin search listing URL for `query` under `base_url`
///
/// The query is form-encoded, so spaces and reserved characters are safe.
pub fn search_url(base_url: &str, query: &str) -> ScrapeResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ScrapeError::Config(format!("invalid base URL '{base_url}': {e}")))?
        .join(SEARCH_PATH)
        .map_err(|e| ScrapeError::Config(format!("invalid search path: {e}")))?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url.into())
}

/// Resolve a listing href (usually site-relative) against `base_url`
///
/// Absolute hrefs are returned unchanged. Falls back to plain concatenation
/// when the base cannot be parsed so a bad base never drops an item.
#[must_use]
pub fn absolute_pin_url(base_url: &str, href: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.into(),
        Err(_) => format!("{}{href}", base_url.trim_end_matches('/')),
    }
}

/// Rewrite a listing thumbnail URL to request the originals variant
#[must_use]
pub fn upscale_thumbnail(src: &str) -> String {
    src.replace(THUMBNAIL_SEGMENT, ORIGINALS_SEGMENT)
}

/// Medium-resolution variant of a high-resolution media URL
///
/// Only URLs containing the recognised high-resolution segment have a
/// fallback; anything else returns `None`.
#[must_use]
pub fn medium_resolution_fallback(src: &str) -> Option<String> {
    if src.contains(HIGH_RES_PATH) {
        Some(src.replacen(HIGH_RES_PATH, MEDIUM_RES_PATH, 1))
    } else {
        None
    }
}

/// Split the last path segment of a media URL into `(stem, extension)`
///
/// Query strings and fragments are ignored. The split happens at the final
/// `.`, so `a.b.jpg` yields `("a.b", "jpg")`.
///
/// # Errors
///
/// `ScrapeError::MalformedUrl` when there is no segment, no `.`, or either
/// side of the separator is empty.
pub fn split_media_filename(src: &str) -> ScrapeResult<(String, String)> {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        Err(_) => src
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            Ok((stem.to_string(), ext.to_string()))
        }
        _ => Err(ScrapeError::MalformedUrl(src.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("https://www.pinterest.com", "cute cats & dogs").unwrap();
        assert_eq!(
            url,
            "https://www.pinterest.com/search/pins/?q=cute+cats+%26+dogs"
        );
    }

    #[test]
    fn test_absolute_pin_url() {
        assert_eq!(
            absolute_pin_url("https://www.pinterest.com", "/pin/123/"),
            "https://www.pinterest.com/pin/123/"
        );
        assert_eq!(
            absolute_pin_url("https://www.pinterest.com", "https://other.example/pin/9/"),
            "https://other.example/pin/9/"
        );
    }

    #[test]
    fn test_upscale_thumbnail() {
        assert_eq!(
            upscale_thumbnail("https://i.pinimg.com/236x/ab/cd/cat.jpg"),
            "https://i.pinimg.com/originals/ab/cd/cat.jpg"
        );
        assert_eq!(
            upscale_thumbnail("https://i.pinimg.com/474x/cat.jpg"),
            "https://i.pinimg.com/474x/cat.jpg"
        );
    }

    #[test]
    fn test_medium_resolution_fallback_only_for_originals() {
        assert_eq!(
            medium_resolution_fallback("https://i.pinimg.com/originals/ab/cat.jpg").as_deref(),
            Some("https://i.pinimg.com/736x/ab/cat.jpg")
        );
        assert_eq!(
            medium_resolution_fallback("https://i.pinimg.com/236x/ab/cat.jpg"),
            None
        );
    }

    #[test]
    fn test_split_media_filename() {
        assert_eq!(
            split_media_filename("https://i.pinimg.com/originals/ab/cat.jpg").unwrap(),
            ("cat".to_string(), "jpg".to_string())
        );
        assert_eq!(
            split_media_filename("https://i.pinimg.com/originals/a.b.png?x=1#f").unwrap(),
            ("a.b".to_string(), "png".to_string())
        );
        assert_eq!(
            split_media_filename("relative/path/img.webp").unwrap(),
            ("img".to_string(), "webp".to_string())
        );
    }

    #[test]
    fn test_split_media_filename_rejects_missing_extension() {
        for bad in [
            "https://i.pinimg.com/originals/ab/cat",
            "https://i.pinimg.com/originals/ab/",
            "https://i.pinimg.com/originals/.jpg",
            "https://i.pinimg.com/originals/cat.",
        ] {
            assert!(
                matches!(split_media_filename(bad), Err(ScrapeError::MalformedUrl(_))),
                "expected MalformedUrl for {bad}"
            );
        }
    }
}
