use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::VacancySink;
use crate::error::Result;
use crate::models::Vacancy;

/// Writes the whole collection as one pretty-printed JSON array.
pub struct SnapshotSink {
    path: PathBuf,
}

impl SnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VacancySink for SnapshotSink {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn write(&self, vacancies: &[Vacancy]) -> Result<usize> {
        let body = serde_json::to_vec_pretty(vacancies)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(vacancies.len())
    }
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<Vacancy>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
