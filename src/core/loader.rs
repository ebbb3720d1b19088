use crate::models::{Dataset, Record};
use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Where the feed document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    File(PathBuf),
    Http(String),
}

impl Default for DataLocation {
    fn default() -> Self {
        DataLocation::File(PathBuf::from("data.json"))
    }
}

impl FromStr for DataLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(DataLocation::Http(trimmed.to_string()))
        } else {
            Ok(DataLocation::File(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::File(path) => write!(f, "{}", path.display()),
            DataLocation::Http(url) => f.write_str(url),
        }
    }
}

/// Fetches the feed once and turns it into a newest-first [`Dataset`].
/// There is no retry and no timeout beyond the transport's own.
pub struct DatasetLoader {
    client: Client,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub async fn load(&self, location: &DataLocation) -> Result<Dataset> {
        let bytes = self.fetch(location).await?;
        let feed = parse_feed(&bytes).with_context(|| format!("Failed to parse {}", location))?;
        info!(records = feed.len(), source = %location, "dataset loaded");
        Ok(Dataset::from_feed(feed))
    }

    async fn fetch(&self, location: &DataLocation) -> Result<Vec<u8>> {
        match location {
            DataLocation::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            DataLocation::Http(url) => {
                let resp = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("Request to {} failed", url))?;

                if !resp.status().is_success() {
                    return Err(anyhow!("{} returned {}", url, resp.status()));
                }

                Ok(resp.bytes().await?.to_vec())
            }
        }
    }
}

/// Parses the feed document. The top level must be an array of objects with
/// a string `Date`; anything wrong inside a numeric field only blanks that field.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_slice(bytes)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_str() {
        assert_eq!(
            "https://example.com/data.json".parse::<DataLocation>().unwrap(),
            DataLocation::Http("https://example.com/data.json".to_string())
        );
        assert_eq!(
            "public/data.json".parse::<DataLocation>().unwrap(),
            DataLocation::File(PathBuf::from("public/data.json"))
        );
        assert_eq!(DataLocation::default().to_string(), "data.json");
    }

    #[test]
    fn test_parse_feed_keeps_source_order() {
        let feed = parse_feed(br#"[{"Date":"2024-01-01","WALCL":1},{"Date":"2024-01-02","MA5":null}]"#).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(feed[0].walcl, Some(1.0));
        assert_eq!(feed[1].ma5, None);
    }

    #[test]
    fn test_parse_feed_keeps_undated_record() {
        let feed = parse_feed(br#"[{"Date":"2024-01-01","WALCL":1},{"WALCL":2}]"#).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[1].date, None);
        assert_eq!(feed[1].walcl, Some(2.0));
    }

    #[test]
    fn test_parse_feed_rejects_non_array() {
        assert!(parse_feed(br#"{"Date":"2024-01-01"}"#).is_err());
        assert!(parse_feed(b"not json").is_err());
    }
}
