use crate::core::loader::DataLocation;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_START: &str = "2020-01-01";
pub const DEFAULT_OUT_DIR: &str = "public";

/// Runtime settings, read from the environment after loading `.env`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data: DataLocation,
    pub out_dir: PathBuf,
    pub start: NaiveDate,
    pub fred_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataLocation::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            fred_api_key: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(data) = get("LIQUIDITY_DATA") {
            settings.data = data.parse().unwrap_or_default();
        }
        if let Some(dir) = get("LIQUIDITY_OUT_DIR") {
            settings.out_dir = PathBuf::from(dir);
        }
        if let Some(start) = get("LIQUIDITY_START") {
            settings.start = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
                .with_context(|| format!("LIQUIDITY_START must be YYYY-MM-DD, got '{}'", start))?;
        }
        settings.fred_api_key = get("FRED_API_KEY");

        Ok(settings)
    }
}
