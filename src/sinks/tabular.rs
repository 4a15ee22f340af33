use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use super::VacancySink;
use crate::error::{CrawlError, Result};
use crate::models::Vacancy;

#[derive(Serialize)]
struct Row<'a> {
    index: usize,
    link: &'a str,
    title: &'a str,
    city: &'a str,
    company: Option<&'a str>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
    currency: Option<&'a str>,
    period: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> Row<'a> {
    fn new(index: usize, v: &'a Vacancy) -> Self {
        Self {
            index,
            link: &v.link,
            title: &v.title,
            city: &v.city,
            company: v.company.as_deref(),
            min_salary: v.min_salary,
            max_salary: v.max_salary,
            currency: v.currency.as_deref(),
            period: v.period.as_deref(),
            description: v.description.as_deref(),
        }
    }
}

/// One CSV row per vacancy, led by a zero-based `index` column.
pub struct TabularSink {
    path: PathBuf,
}

impl TabularSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VacancySink for TabularSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn write(&self, vacancies: &[Vacancy]) -> Result<usize> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for (index, vacancy) in vacancies.iter().enumerate() {
            writer.serialize(Row::new(index, vacancy))?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| CrawlError::Csv(e.to_string()))?;
        tokio::fs::write(&self.path, body).await?;
        Ok(vacancies.len())
    }
}
