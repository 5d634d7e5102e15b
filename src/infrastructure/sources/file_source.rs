//! Local file source, reading a JSON document shaped like the published one.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::domain::entities::CountryRecord;
use crate::domain::source::CountrySource;
use crate::error::AppError;

/// Reads the dataset from a local `countries.json`.
pub struct FileCountrySource {
    path: PathBuf,
}

impl FileCountrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CountrySource for FileCountrySource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, AppError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records: Vec<CountryRecord> = serde_json::from_slice(&bytes)?;

        info!(path = %self.path.display(), records = records.len(), "Loaded country dataset");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
