//! Listing page parsing
//!
//! Turns the rendered listing HTML into partial item records. Items without
//! an anchor, href, image or image source are skipped.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::metadata::ItemRecord;
use crate::utils::{absolute_pin_url, upscale_thumbnail};

/// Container that signals the listing has rendered
pub const LISTING_CONTAINER_SELECTOR: &str = "div[role='list']";

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[role='listitem']")
        .expect("BUG: hardcoded CSS selector \"div[role='listitem']\" is invalid")
});

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("BUG: hardcoded CSS selector 'a' is invalid"));

static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid"));

/// Extract every well-formed listing item in document order
///
/// The thumbnail URL is rewritten to the originals variant and the href is
/// resolved against `base_url`. Duplicates are kept; the collector dedups.
#[must_use]
pub fn parse_listing(html: &str, base_url: &str) -> Vec<ItemRecord> {
    let document = Html::parse_document(html);

    document
        .select(&LIST_ITEM)
        .filter_map(|item| {
            let anchor = item.select(&ANCHOR).next()?;
            let href = anchor.value().attr("href").filter(|h| !h.trim().is_empty())?;
            let image = anchor.select(&IMAGE).next()?;
            let src = image.value().attr("src").filter(|s| !s.trim().is_empty())?;

            Some(ItemRecord::new(
                absolute_pin_url(base_url, href.trim()),
                image.value().attr("alt").map(str::to_string),
                upscale_thumbnail(src.trim()),
            ))
        })
        .collect()
}
