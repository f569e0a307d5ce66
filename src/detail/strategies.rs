//! Detail page extraction strategies
//!
//! The detail page comes in more than one markup layout. Each layout is a
//! named strategy; they are tried in priority order and the first one whose
//! container is present on the page wins. When the site changes its markup
//! only the affected strategy needs touching.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::DetailData;

// Hardcoded selectors should never fail to parse
static CLOSEUP_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-test-id='CloseupDetails']")
        .expect("BUG: hardcoded CSS selector for CloseupDetails is invalid")
});

static CLOSEUP_MEDIA: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-test-id='closeup-image']")
        .expect("BUG: hardcoded CSS selector for closeup-image is invalid")
});

static PAGE_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-test-id='closeup-body']")
        .expect("BUG: hardcoded CSS selector for closeup-body is invalid")
});

static PAGE_CONTAINER_MEDIA: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-test-id='pin-closeup-image']")
        .expect("BUG: hardcoded CSS selector for pin-closeup-image is invalid")
});

static IMAGE_WITH_SRC: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[src]").expect("BUG: hardcoded CSS selector 'img[src]' is invalid")
});

static VASE_TAG: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-test-id='vase-tag']")
        .expect("BUG: hardcoded CSS selector for vase-tag is invalid")
});

static SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("BUG: hardcoded CSS selector 'span' is invalid"));

static VIDEO_POSTER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("video[poster]").expect("BUG: hardcoded CSS selector 'video[poster]' is invalid")
});

/// A single detail page layout
pub trait DetailStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract detail data, or `None` if the page is not in this layout
    fn extract(&self, document: &Html) -> Option<DetailData>;
}

/// Photo pin layout with the `CloseupDetails` panel
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseupLayout;

impl DetailStrategy for CloseupLayout {
    fn name(&self) -> &'static str {
        "closeup"
    }

    fn extract(&self, document: &Html) -> Option<DetailData> {
        let container = document.select(&CLOSEUP_CONTAINER).next()?;
        Some(DetailData {
            tags: extract_tags(container),
            media_src: extract_media(document, container, &CLOSEUP_MEDIA),
        })
    }
}

/// Alternate full-page layout, used for video pins among others
#[derive(Debug, Clone, Copy, Default)]
pub struct PageContainerLayout;

impl DetailStrategy for PageContainerLayout {
    fn name(&self) -> &'static str {
        "page-container"
    }

    fn extract(&self, document: &Html) -> Option<DetailData> {
        let container = document.select(&PAGE_CONTAINER).next()?;
        Some(DetailData {
            tags: extract_tags(container),
            media_src: extract_media(document, container, &PAGE_CONTAINER_MEDIA),
        })
    }
}

/// Strategies in the order they are tried
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn DetailStrategy>> {
    vec![Box::new(CloseupLayout), Box::new(PageContainerLayout)]
}

/// Run `strategies` in order against `html`
///
/// Returns the name of the matching strategy alongside its data, or `None`
/// when no layout was recognised.
#[must_use]
pub fn extract_detail(
    html: &str,
    strategies: &[Box<dyn DetailStrategy>],
) -> Option<(&'static str, DetailData)> {
    let document = Html::parse_document(html);
    strategies
        .iter()
        .find_map(|strategy| strategy.extract(&document).map(|data| (strategy.name(), data)))
}

fn extract_tags(container: ElementRef<'_>) -> Vec<String> {
    container
        .select(&VASE_TAG)
        .filter_map(|tag| tag.select(&SPAN).next())
        .map(|span| span.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Video poster first, then the layout's still image
///
/// Only the layout's media wrapper and its details container are searched,
/// so videos elsewhere on the page (related pins, ads) are never picked up.
fn extract_media(
    document: &Html,
    container: ElementRef<'_>,
    media_wrapper: &Selector,
) -> Option<String> {
    let regions: Vec<ElementRef<'_>> = document
        .select(media_wrapper)
        .chain(std::iter::once(container))
        .collect();

    let poster = regions.iter().find_map(|region| {
        region
            .select(&VIDEO_POSTER)
            .find_map(|video| non_blank(video.value().attr("poster")))
    });

    poster.or_else(|| {
        document
            .select(media_wrapper)
            .flat_map(|wrapper| wrapper.select(&IMAGE_WITH_SRC))
            .find_map(|img| non_blank(img.value().attr("src")))
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTO_PAGE: &str = r#"
        <html><body>
          <div data-test-id="closeup-image">
            <img src="https://i.pinimg.com/originals/ab/cat.jpg" alt="a cat">
          </div>
          <div data-test-id="CloseupDetails">
            <div data-test-id="vase-tag"><a><span>cute</span></a></div>
            <div data-test-id="vase-tag"><a><span> cat </span></a></div>
            <div data-test-id="vase-tag"><a></a></div>
          </div>
        </body></html>
    "#;

    const VIDEO_PAGE: &str = r#"
        <html><body>
          <div data-test-id="closeup-body">
            <video poster="https://i.pinimg.com/videos/thumbnails/originals/dog.jpg"></video>
            <div data-test-id="vase-tag"><span>dog</span></div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_closeup_layout_extracts_tags_and_image() {
        let document = Html::parse_document(PHOTO_PAGE);
        let data = CloseupLayout.extract(&document).unwrap();

        assert_eq!(data.tags, vec!["cute", "cat"]);
        assert_eq!(
            data.media_src.as_deref(),
            Some("https://i.pinimg.com/originals/ab/cat.jpg")
        );
        assert!(PageContainerLayout.extract(&document).is_none());
    }

    #[test]
    fn test_page_container_layout_prefers_video_poster() {
        let document = Html::parse_document(VIDEO_PAGE);
        assert!(CloseupLayout.extract(&document).is_none());

        let data = PageContainerLayout.extract(&document).unwrap();
        assert_eq!(data.tags, vec!["dog"]);
        assert_eq!(
            data.media_src.as_deref(),
            Some("https://i.pinimg.com/videos/thumbnails/originals/dog.jpg")
        );
    }

    #[test]
    fn test_unrelated_video_does_not_replace_closeup_image() {
        let html = r#"
            <html><body>
              <div data-test-id="closeup-image">
                <img src="https://i.pinimg.com/originals/ab/cat.jpg">
              </div>
              <div data-test-id="CloseupDetails">
                <div data-test-id="vase-tag"><span>cat</span></div>
              </div>
              <div data-test-id="related-pins">
                <video poster="https://i.pinimg.com/videos/thumbnails/originals/OTHER.jpg"></video>
              </div>
            </body></html>
        "#;
        let (name, data) = extract_detail(html, &default_strategies()).unwrap();

        assert_eq!(name, "closeup");
        assert_eq!(
            data.media_src.as_deref(),
            Some("https://i.pinimg.com/originals/ab/cat.jpg")
        );
    }

    #[test]
    fn test_video_inside_closeup_media_wins_over_still() {
        let html = r#"
            <div data-test-id="closeup-image">
              <video poster="https://i.pinimg.com/videos/thumbnails/originals/clip.jpg"></video>
              <img src="https://i.pinimg.com/originals/still.jpg">
            </div>
            <div data-test-id="CloseupDetails"></div>
        "#;
        let (_, data) = extract_detail(html, &default_strategies()).unwrap();

        assert_eq!(
            data.media_src.as_deref(),
            Some("https://i.pinimg.com/videos/thumbnails/originals/clip.jpg")
        );
    }

    #[test]
    fn test_media_unset_without_video_or_image() {
        let html = r#"<div data-test-id="CloseupDetails">
            <div data-test-id="vase-tag"><span>only</span></div></div>"#;
        let (name, data) = extract_detail(html, &default_strategies()).unwrap();

        assert_eq!(name, "closeup");
        assert_eq!(data.tags, vec!["only"]);
        assert_eq!(data.media_src, None);
    }

    #[test]
    fn test_strategy_order_and_unrecognised_page() {
        let strategies = default_strategies();
        let (name, _) = extract_detail(VIDEO_PAGE, &strategies).unwrap();
        assert_eq!(name, "page-container");

        assert!(extract_detail("<html><body>loading…</body></html>", &strategies).is_none());
    }
}
