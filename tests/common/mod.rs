//! Test utilities shared by the pinscrape integration tests

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use pinscrape::{DetailSource, ItemRecord, ListingSession};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

#[allow(dead_code)]
pub const BASE: &str = "https://www.pinterest.com";

/// Rendered listing markup with one list item per `(href, thumbnail)` pair
#[allow(dead_code)]
pub fn listing_html(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(href, src)| {
            format!(
                r#"<div role="listitem"><a href="{href}"><img alt="pin {href}" src="{src}"></a></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div role="list">{body}</div></body></html>"#)
}

/// Listing markup for pins `/pin/{id}/` with thumbnails named after the id
#[allow(dead_code)]
pub fn listing_of(ids: &[u32]) -> String {
    let items: Vec<(String, String)> = ids
        .iter()
        .map(|id| {
            (
                format!("/pin/{id}/"),
                format!("https://i.pinimg.com/236x/{id}.jpg"),
            )
        })
        .collect();
    let refs: Vec<(&str, &str)> = items.iter().map(|(h, s)| (h.as_str(), s.as_str())).collect();
    listing_html(&refs)
}

/// Detail page in the closeup layout
#[allow(dead_code)]
pub fn closeup_page(tags: &[&str], image: Option<&str>) -> String {
    let tags: String = tags
        .iter()
        .map(|t| format!(r#"<div data-test-id="vase-tag"><a><span>{t}</span></a></div>"#))
        .collect();
    let image = image
        .map(|src| format!(r#"<div data-test-id="closeup-image"><img src="{src}"></div>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>{image}<div data-test-id="CloseupDetails">{tags}</div></body></html>"#
    )
}

#[allow(dead_code)]
pub fn record(page_url: &str, media_src: &str, tags: &[&str]) -> ItemRecord {
    let mut record = ItemRecord::new(page_url, None, media_src);
    record.tags = tags.iter().map(|t| (*t).to_string()).collect();
    record
}

/// Listing session replaying a fixed sequence of rendered pages
///
/// Every scroll advances to the next page; the last page repeats forever.
#[allow(dead_code)]
pub struct ScriptedSession {
    pages: Vec<String>,
    position: usize,
    pub scrolls: u32,
    pub fail_scrolls: bool,
    /// Page reads (1-based) that fail instead of returning HTML
    pub failing_reads: Vec<u32>,
    reads: u32,
    /// Container shows up on this check (1-based); `None` means never
    pub container_on_check: Option<u32>,
    pub container_checks: u32,
}

#[allow(dead_code)]
impl ScriptedSession {
    pub fn new(pages: Vec<String>) -> Self {
        assert!(!pages.is_empty(), "a session needs at least one page");
        Self {
            pages,
            position: 0,
            scrolls: 0,
            fail_scrolls: false,
            failing_reads: Vec::new(),
            reads: 0,
            container_on_check: Some(1),
            container_checks: 0,
        }
    }
}

#[async_trait]
impl ListingSession for ScriptedSession {
    async fn has_container(&mut self) -> Result<bool> {
        self.container_checks += 1;
        Ok(self
            .container_on_check
            .is_some_and(|check| self.container_checks >= check))
    }

    async fn page_html(&mut self) -> Result<String> {
        self.reads += 1;
        if self.failing_reads.contains(&self.reads) {
            return Err(anyhow!("transient CDP error"));
        }
        Ok(self.pages[self.position].clone())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.scrolls += 1;
        self.position = (self.position + 1).min(self.pages.len() - 1);
        if self.fail_scrolls {
            return Err(anyhow!("scripted scroll failure"));
        }
        Ok(())
    }
}

/// Detail source that fails a fixed number of times before serving a page
#[allow(dead_code)]
pub struct FlakySource {
    failures_left: AtomicU32,
    calls: Arc<AtomicU32>,
    page: String,
}

#[allow(dead_code)]
impl FlakySource {
    pub fn new(failures: u32, page: impl Into<String>) -> Self {
        Self {
            failures_left: AtomicU32::new(failures),
            calls: Arc::new(AtomicU32::new(0)),
            page: page.into(),
        }
    }

    /// Shared counter of `fetch_page` calls, usable after the source moved
    pub fn calls_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl DetailSource for FlakySource {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(anyhow!("connection reset ({left} failures left)"));
        }
        Ok(self.page.clone())
    }
}

/// Detail source serving responses in order, then repeating the last one
#[allow(dead_code)]
pub struct SequenceSource {
    responses: Mutex<VecDeque<Result<String, String>>>,
}

#[allow(dead_code)]
impl SequenceSource {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl DetailSource for SequenceSource {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        let mut responses = self.responses.lock().map_err(|_| anyhow!("poisoned"))?;
        let next = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        match next {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted response")),
        }
    }
}
