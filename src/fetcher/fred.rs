use async_trait::async_trait;
use crate::models::DataPoint;
use super::DataSource;
use anyhow::{Result, anyhow, Context};
use reqwest::Client;
use serde_json::Value;
use chrono::{NaiveDate, TimeZone, Utc};
use tracing::{debug, info, warn};

const OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

pub struct FredFetcher {
    api_key: String,
    client: Client,
    observation_start: Option<NaiveDate>,
}

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

impl FredFetcher {
    pub fn new(api_key: String, observation_start: Option<NaiveDate>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("NetLiquidityDashboard/1.0"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client, observation_start }
    }
}

#[async_trait]
impl DataSource for FredFetcher {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>> {
        let sanitized_key = self.api_key.trim().to_lowercase();

        // Length only, never the key itself.
        debug!(key_len = sanitized_key.len(), "FRED key loaded");

        if sanitized_key.is_empty() {
            return Err(anyhow!("FRED API key is empty or missing"));
        }

        if sanitized_key.len() != 32 {
            warn!(key_len = sanitized_key.len(), "FRED API key is not 32 characters, request will likely fail");
        }

        let mut query = vec![
            ("series_id", series_id.to_string()),
            ("api_key", sanitized_key),
            ("file_type", "json".to_string()),
        ];

        // Pull a year of history before the first business day so the
        // forward fill has a value to start from.
        if let Some(start) = self.observation_start {
            let lookback = start - chrono::Duration::days(366);
            query.push(("observation_start", lookback.format("%Y-%m-%d").to_string()));
        }

        info!(series_id, "fetching FRED observations");

        let resp = self
            .client
            .get(OBSERVATIONS_URL)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("FRED request for {} failed", series_id))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("FRED API error for {}: {} - Body: {}", series_id, status, error_text));
        }

        let json: Value = resp.json().await?;
        let points = Self::parse_observations(&json)?;
        info!(series_id, points = points.len(), "FRED observations parsed");
        Ok(points)
    }
}

impl FredFetcher {
    fn parse_observations(json: &Value) -> Result<Vec<DataPoint>> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| anyhow!("No observations found in FRED response"))?;

        let mut data_points = Vec::new();

        for obs in observations {
            // "date": "2023-01-01", "value": "123.45"
            if let (Some(date_str), Some(value_str)) = (obs["date"].as_str(), obs["value"].as_str()) {
                // FRED marks missing prints with "."
                if value_str == "." {
                    continue;
                }

                if let Ok(value) = value_str.parse::<f64>() {
                    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
                    let timestamp = Utc.from_utc_datetime(&naive_date.and_time(chrono::NaiveTime::MIN));

                    data_points.push(DataPoint {
                        timestamp,
                        value,
                    });
                }
            }
        }

        Ok(data_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_response() {
        let json_data = json!({
            "observations": [
                { "date": "2023-01-04", "value": "8551169" },
                { "date": "2023-01-11", "value": "8507166" }
            ]
        });

        let points = FredFetcher::parse_observations(&json_data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 8551169.0);
        assert_eq!(points[1].timestamp.date_naive(), NaiveDate::from_ymd_opt(2023, 1, 11).unwrap());
    }

    #[test]
    fn test_parse_missing_value() {
        let json_data = json!({
            "observations": [
                { "date": "2023-01-02", "value": "." },
                { "date": "2023-01-03", "value": "2188.272" }
            ]
        });

        let points = FredFetcher::parse_observations(&json_data).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 2188.272);
    }

    #[test]
    fn test_parse_invalid_format() {
        let json_data = json!({ "error_code": 400, "error_message": "Bad Request" });
        let result = FredFetcher::parse_observations(&json_data);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_before_request() {
        let fetcher = FredFetcher::new("   ".to_string(), None);
        let err = fetcher.fetch_data("WALCL").await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
