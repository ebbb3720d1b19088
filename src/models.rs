use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};

/// One observation of a raw source series (e.g. a FRED weekly print).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One business day of the liquidity feed.
///
/// Field names match the feed exactly. Every field is optional and
/// deserializes leniently: a missing key, `null`, or a value of the wrong type
/// all become `None` instead of failing the whole document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Record {
    #[serde(rename = "Date", default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "WALCL", default, deserialize_with = "lenient_number")]
    pub walcl: Option<f64>,
    #[serde(rename = "WDTGAL", default, deserialize_with = "lenient_number")]
    pub wdtgal: Option<f64>,
    #[serde(rename = "RRPONTSYD", default, deserialize_with = "lenient_number")]
    pub rrpontsyd: Option<f64>,
    #[serde(rename = "NetLiquidity", default, deserialize_with = "lenient_number")]
    pub net_liquidity: Option<f64>,
    #[serde(rename = "YoY", default, deserialize_with = "lenient_number")]
    pub yoy: Option<f64>,
    #[serde(rename = "MoM", default, deserialize_with = "lenient_number")]
    pub mom: Option<f64>,
    #[serde(rename = "WoW", default, deserialize_with = "lenient_number")]
    pub wow: Option<f64>,
    #[serde(rename = "MA5", default, deserialize_with = "lenient_number")]
    pub ma5: Option<f64>,
    #[serde(rename = "MA20", default, deserialize_with = "lenient_number")]
    pub ma20: Option<f64>,
    #[serde(rename = "MA60", default, deserialize_with = "lenient_number")]
    pub ma60: Option<f64>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

/// Immutable, newest-first snapshot of the feed for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Takes the feed in its source order (oldest first) and flips it.
    pub fn from_feed(mut feed: Vec<Record>) -> Self {
        feed.reverse();
        Self { records: feed }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn oldest(&self) -> Option<&Record> {
        self.records.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_absent_and_malformed_fields() {
        let record: Record = serde_json::from_value(json!({
            "Date": "2024-03-07",
            "WALCL": 7_500_000_000_000.0,
            "WDTGAL": null,
            "RRPONTSYD": "oops",
            "YoY": -0.033
        }))
        .unwrap();

        assert_eq!(record.date.as_deref(), Some("2024-03-07"));
        assert_eq!(record.walcl, Some(7_500_000_000_000.0));
        assert_eq!(record.wdtgal, None);
        assert_eq!(record.rrpontsyd, None);
        assert_eq!(record.net_liquidity, None);
        assert_eq!(record.yoy, Some(-0.033));
        assert_eq!(record.ma60, None);
    }

    #[test]
    fn test_record_without_date_is_kept() {
        let record: Record = serde_json::from_value(json!({ "WALCL": 1.0 })).unwrap();
        assert_eq!(record.date, None);
        assert_eq!(record.walcl, Some(1.0));

        let record: Record = serde_json::from_value(json!({ "Date": 20240307, "MA5": 2.0 })).unwrap();
        assert_eq!(record.date, None);
        assert_eq!(record.ma5, Some(2.0));
    }

    #[test]
    fn test_record_serializes_nulls() {
        let record = Record { date: Some("2024-01-02".into()), ma5: Some(1.5), ..Default::default() };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Date"], "2024-01-02");
        assert_eq!(value["MA5"], 1.5);
        assert!(value["NetLiquidity"].is_null());
    }

    #[test]
    fn test_dataset_is_newest_first() {
        let feed = ["2024-01-01", "2024-01-02", "2024-01-03"]
            .iter()
            .map(|d| Record { date: Some(d.to_string()), ..Default::default() })
            .collect();

        let dataset = Dataset::from_feed(feed);
        let dates: Vec<&str> = dataset.records().iter().map(|r| r.date.as_deref().unwrap_or_default()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert_eq!(dataset.latest().unwrap().date.as_deref(), Some("2024-01-03"));
        assert_eq!(dataset.oldest().unwrap().date.as_deref(), Some("2024-01-01"));
    }
}
