//! Tests for the type-safe configuration builders

use pinscrape::{DownloadConfig, ScrapeConfig};
use std::path::Path;
use std::time::Duration;

#[test]
fn test_scrape_builder_defaults() {
    let config = ScrapeConfig::builder().query("cats").build().unwrap();

    assert_eq!(config.query(), "cats");
    assert_eq!(config.base_url(), "https://www.pinterest.com");
    assert_eq!(config.target_count(), 30);
    assert_eq!(config.max_stall_rounds(), 10);
    assert_eq!(config.output_file(), Path::new("output.json"));
    assert_eq!(config.detail_workers(), 100);
    assert!(config.headless());
    assert!(config.stealth_mode());
    assert_eq!(config.load_timeout(), Duration::from_secs(10));
    assert_eq!(config.scroll_pause(), Duration::from_millis(1000));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.max_attempts(), 8);
    assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
    assert_eq!(config.retry_max_delay(), Duration::from_secs(30));
    assert!(config.chrome_data_dir().is_none());
}

#[test]
fn test_scrape_builder_with_all_optional_fields() {
    let config = ScrapeConfig::builder()
        .target_count(5)
        .query("  sunsets  ")
        .base_url("http://127.0.0.1:8080")
        .max_stall_rounds(2)
        .output_file("data/out.json")
        .detail_workers(4)
        .headless(false)
        .stealth_mode(false)
        .load_timeout_secs(3)
        .scroll_pause_ms(50)
        .request_timeout_secs(7)
        .max_attempts(2)
        .retry_delays_ms(10, 40)
        .chrome_data_dir("/tmp/profile")
        .build()
        .unwrap();

    assert_eq!(config.query(), "sunsets");
    assert_eq!(config.target_count(), 5);
    assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    assert_eq!(config.output_file(), Path::new("data/out.json"));
    assert!(!config.headless());
    assert!(!config.stealth_mode());
    assert_eq!(config.scroll_pause(), Duration::from_millis(50));
    assert_eq!(config.retry_max_delay(), Duration::from_millis(40));
    assert_eq!(
        config.chrome_data_dir().map(|p| p.as_path()),
        Some(Path::new("/tmp/profile"))
    );
}

#[test]
fn test_scrape_builder_rejects_invalid_values() {
    assert!(ScrapeConfig::builder().query("   ").build().is_err());
    assert!(ScrapeConfig::builder().query("x").detail_workers(0).build().is_err());
    assert!(ScrapeConfig::builder().query("x").max_attempts(0).build().is_err());
    assert!(ScrapeConfig::builder().query("x").base_url("not a url").build().is_err());
}

#[test]
fn test_retry_ceiling_never_below_base() {
    let config = ScrapeConfig::builder()
        .query("x")
        .retry_delays_ms(800, 100)
        .build()
        .unwrap();

    assert_eq!(config.retry_max_delay(), Duration::from_millis(800));
}

#[test]
fn test_download_builder_defaults() {
    let config = DownloadConfig::builder()
        .input_file("output.json")
        .output_dir("media")
        .build()
        .unwrap();

    assert_eq!(config.input_file(), Path::new("output.json"));
    assert_eq!(config.output_dir(), Path::new("media"));
    assert_eq!(config.limit(), None);
    assert_eq!(config.workers(), 10);
    assert_eq!(config.caption_ext(), "caption");
    assert_eq!(config.request_timeout(), Duration::from_secs(60));
    assert_eq!(config.max_media_bytes(), 64 * 1024 * 1024);
}

#[test]
fn test_download_limit_zero_means_no_limit() {
    let config = DownloadConfig::builder()
        .input_file("in.json")
        .output_dir("out")
        .limit(Some(0))
        .build()
        .unwrap();

    assert_eq!(config.limit(), None);
}

#[test]
fn test_download_builder_rejects_zero_media_limit() {
    assert!(
        DownloadConfig::builder()
            .input_file("in.json")
            .output_dir("out")
            .max_media_bytes(0)
            .build()
            .is_err()
    );
}

#[test]
fn test_download_builder_caption_ext_and_validation() {
    let config = DownloadConfig::builder()
        .input_file("in.json")
        .output_dir("out")
        .caption_ext(".txt")
        .limit(Some(3))
        .build()
        .unwrap();
    assert_eq!(config.caption_ext(), "txt");
    assert_eq!(config.limit(), Some(3));

    assert!(
        DownloadConfig::builder()
            .input_file("in.json")
            .output_dir("out")
            .caption_ext(".")
            .build()
            .is_err()
    );
    assert!(
        DownloadConfig::builder()
            .input_file("in.json")
            .output_dir("out")
            .workers(0)
            .build()
            .is_err()
    );
}

#[test]
fn test_config_serializes() {
    let config = ScrapeConfig::builder().query("cats").build().unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: ScrapeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.query(), "cats");
    assert_eq!(back.target_count(), config.target_count());
}
