pub mod document;
pub mod snapshot;
pub mod tabular;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Vacancy;

pub use document::{DocumentSink, WriteMode};
pub use snapshot::{load_snapshot, SnapshotSink};
pub use tabular::TabularSink;

/// A destination for the records of one run.
#[async_trait]
pub trait VacancySink: Send + Sync {
    fn name(&self) -> &str;

    /// Persists `vacancies` and returns how many were written.
    async fn write(&self, vacancies: &[Vacancy]) -> Result<usize>;
}

#[derive(Debug)]
pub struct SinkReport {
    pub sink: String,
    pub outcome: Result<usize>,
}

/// Runs every sink in order. A failing sink does not stop the ones after it.
pub async fn write_all(sinks: &[Box<dyn VacancySink>], vacancies: &[Vacancy]) -> Vec<SinkReport> {
    let mut reports = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let outcome = sink.write(vacancies).await;
        match &outcome {
            Ok(n) => tracing::info!("✅ {} saved {} vacancies", sink.name(), n),
            Err(e) => tracing::error!("❌ {} failed: {}", sink.name(), e),
        }
        reports.push(SinkReport {
            sink: sink.name().to_string(),
            outcome,
        });
    }
    reports
}
