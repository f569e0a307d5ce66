use log::warn;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use super::ItemRecord;
use crate::errors::{ScrapeError, ScrapeResult};

/// Timeout for blocking JSON serialization
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Replace raw U+2029 paragraph separators with the `\n` escape
///
/// serde_json writes U+2029 verbatim, and the character only ever appears
/// inside string literals, so the escape keeps the document valid.
#[must_use]
pub fn normalize_paragraph_separators(json: &str) -> String {
    json.replace('\u{2029}', "\\n")
}

/// Serialize records as four-space indented JSON with separators normalized
pub fn to_json_string(records: &[ItemRecord]) -> ScrapeResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;

    let json = String::from_utf8(buf)
        .map_err(|e| ScrapeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    Ok(normalize_paragraph_separators(&json))
}

/// Write the metadata file
pub async fn save_records(records: Vec<ItemRecord>, path: &Path) -> ScrapeResult<()> {
    let blocking_task = tokio::task::spawn_blocking(move || to_json_string(&records));

    let json = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => {
            return Err(ScrapeError::Pool(format!(
                "JSON serialization task panicked: {e}"
            )));
        }
        Err(_) => {
            warn!("JSON serialization timeout (timeout: {BLOCKING_SERIALIZATION_TIMEOUT:?})");
            return Err(ScrapeError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "JSON serialization timed out",
            )));
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;

    Ok(())
}

/// Read the metadata file written by [`save_records`]
pub async fn load_records(path: &Path) -> ScrapeResult<Vec<ItemRecord>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}
