use crate::core::timeseries::business_days;
use crate::fetcher::DataSource;
use crate::indicators::liquidity::NetLiquidity;
use crate::models::Record;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

/// Fetches the Net Liquidity inputs from `source` and derives the full feed
/// for the business days from `start` to `end`, oldest first.
pub async fn build_records(
    source: &dyn DataSource,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Record>> {
    let indicator = NetLiquidity;
    info!("Orchestrator: processing '{}' from {} ({} to {})", indicator.name(), source.name(), start, end);

    let mut inputs = Vec::new();
    for series_id in indicator.required_inputs() {
        let data = source
            .fetch_data(series_id)
            .await
            .with_context(|| format!("Fetch failed for {}", series_id))?;
        if data.is_empty() {
            warn!(series_id, "source returned no observations");
        }
        inputs.push(data);
    }

    let calendar = business_days(start, end);
    if calendar.is_empty() {
        return Err(anyhow!("No business days between {} and {}", start, end));
    }

    let records = indicator
        .calculate(&inputs, &calendar)
        .with_context(|| format!("Calculation failed for {}", indicator.slug()))?;

    info!(records = records.len(), business_days = calendar.len(), "calculation complete for {}", indicator.slug());
    Ok(records)
}

/// Rebuilds the feed and writes it to `path` as a pretty-printed JSON array.
///
/// The file is replaced only after the whole computation succeeded, so a
/// failed update leaves the previous feed in place. Returns the record count.
pub async fn update_dataset(
    source: &dyn DataSource,
    start: NaiveDate,
    end: NaiveDate,
    path: &Path,
) -> Result<usize> {
    let records = build_records(source, start, end).await?;
    write_feed(&records, path).await?;
    info!(path = %path.display(), records = records.len(), "data updated successfully");
    Ok(records.len())
}

async fn write_feed(records: &[Record], path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, json)
        .await
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    tokio::fs::rename(&staging, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct FixedSource {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl DataSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>> {
            if self.fail_on == Some(series_id) {
                return Err(anyhow!("boom"));
            }
            let value = match series_id {
                "WALCL" => 7_000_000.0,
                "WDTGAL" => 800_000.0,
                _ => 500.0,
            };
            let day = NaiveDate::from_ymd_opt(2023, 12, 27).unwrap();
            Ok(vec![DataPoint {
                timestamp: Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap()),
                value,
            }])
        }
    }

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_build_records() {
        let records = build_records(&FixedSource { fail_on: None }, jan(1), jan(12)).await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(records[9].date.as_deref(), Some("2024-01-12"));
        assert_eq!(records[0].net_liquidity, Some(5_700_000_000_000.0));
        assert_eq!(records[5].wow, Some(0.0));
        assert_eq!(records[4].ma5, Some(5_700_000_000_000.0));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "[]").unwrap();

        let result = update_dataset(&FixedSource { fail_on: Some("WDTGAL") }, jan(1), jan(12), &path).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_update_writes_ascending_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let count = update_dataset(&FixedSource { fail_on: None }, jan(1), jan(5), &path).await.unwrap();
        assert_eq!(count, 5);

        let written: Vec<Record> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written.first().unwrap().date.as_deref(), Some("2024-01-01"));
        assert_eq!(written.last().unwrap().date.as_deref(), Some("2024-01-05"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
