//! The per-item record carried from listing collection to download

use serde::{Deserialize, Serialize};

use crate::detail::DetailData;

/// One discovered media item
///
/// Serialized with the short keys of the metadata file: `url`, `alt`,
/// `src` and `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Absolute URL of the item's detail page
    #[serde(rename = "url")]
    pub page_url: String,

    /// Accessibility text of the listing thumbnail
    #[serde(rename = "alt")]
    pub alt_text: Option<String>,

    /// Best known media URL; never empty once set
    #[serde(rename = "src")]
    pub media_src: String,

    /// Tags in page order, empty until the detail phase fills them
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ItemRecord {
    #[must_use]
    pub fn new(
        page_url: impl Into<String>,
        alt_text: Option<String>,
        media_src: impl Into<String>,
    ) -> Self {
        Self {
            page_url: page_url.into(),
            alt_text,
            media_src: media_src.into(),
            tags: Vec::new(),
        }
    }

    /// Deduplication key within a collection run
    ///
    /// Listing hrefs are resolved against a single base URL, so the page URL
    /// identifies an item exactly as its href does.
    #[must_use]
    pub fn item_url(&self) -> &str {
        &self.page_url
    }

    /// Merge detail-page data into the record
    ///
    /// Tags are replaced. The media URL is only replaced by a non-blank value.
    pub fn apply_detail(&mut self, detail: DetailData) {
        self.tags = detail.tags;
        if let Some(src) = detail.media_src.filter(|s| !s.trim().is_empty()) {
            self.media_src = src;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_detail_replaces_tags_and_media() {
        let mut record = ItemRecord::new(
            "https://www.pinterest.com/pin/1/",
            None,
            "https://i.pinimg.com/236x/cat.jpg",
        );
        record.apply_detail(DetailData {
            tags: vec!["cute".into(), "cat".into()],
            media_src: Some("https://i.pinimg.com/originals/cat.jpg".into()),
        });

        assert_eq!(record.tags, vec!["cute", "cat"]);
        assert_eq!(record.media_src, "https://i.pinimg.com/originals/cat.jpg");
    }

    #[test]
    fn test_apply_detail_keeps_media_when_absent_or_blank() {
        let mut record = ItemRecord::new("u", Some("alt".into()), "https://i.pinimg.com/a.jpg");

        record.apply_detail(DetailData {
            tags: vec!["x".into()],
            media_src: None,
        });
        assert_eq!(record.media_src, "https://i.pinimg.com/a.jpg");

        record.apply_detail(DetailData {
            tags: vec![],
            media_src: Some("  ".into()),
        });
        assert_eq!(record.media_src, "https://i.pinimg.com/a.jpg");
        assert!(record.tags.is_empty());
    }
}
