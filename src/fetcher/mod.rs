use async_trait::async_trait;
use anyhow::Result;
use crate::models::DataPoint;

pub mod fred;

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>>;
}
