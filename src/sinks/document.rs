use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::*;
use sea_orm::{Condition, DatabaseConnection, QueryOrder, Set};

use super::VacancySink;
use crate::entities::vacancy::{ActiveModel, Column};
use crate::entities::Vacancies;
use crate::error::Result;
use crate::models::Vacancy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Append every record as a new row; no uniqueness check.
    Insert,
    /// Insert or replace by `link`. Re-running a crawl does not add rows.
    Upsert,
}

/// Document-store sink backed by the `vacancies` table.
pub struct DocumentSink {
    db: DatabaseConnection,
    mode: WriteMode,
}

impl DocumentSink {
    pub fn new(db: DatabaseConnection, mode: WriteMode) -> Self {
        Self { db, mode }
    }

    pub async fn insert_many(&self, vacancies: &[Vacancy]) -> Result<usize> {
        if vacancies.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let models = vacancies
            .iter()
            .map(|v| ActiveModel::from_vacancy(v, now));
        Vacancies::insert_many(models).exec(&self.db).await?;
        Ok(vacancies.len())
    }

    pub async fn upsert(&self, vacancies: &[Vacancy]) -> Result<usize> {
        let now = Utc::now();
        for vacancy in vacancies {
            let mut am = ActiveModel::from_vacancy(vacancy, now);
            let existing = Vacancies::find()
                .filter(Column::Link.eq(vacancy.link.as_str()))
                .order_by_asc(Column::Id)
                .one(&self.db)
                .await?;
            match existing {
                Some(row) => {
                    am.id = Set(row.id);
                    am.update(&self.db).await?;
                    tracing::debug!("Updated vacancy: {}", vacancy.link);
                }
                None => {
                    am.insert(&self.db).await?;
                    tracing::debug!("Inserted vacancy: {}", vacancy.link);
                }
            }
        }
        Ok(vacancies.len())
    }

    /// Vacancies paying at least `threshold`: an upper bound at or above it, or
    /// only a lower bound at or above it.
    pub async fn find_by_min_salary(&self, threshold: i64) -> Result<Vec<Vacancy>> {
        let rows = Vacancies::find()
            .filter(
                Condition::any()
                    .add(Column::MaxSalary.gte(threshold))
                    .add(
                        Condition::all()
                            .add(Column::MinSalary.gte(threshold))
                            .add(Column::MaxSalary.is_null()),
                    ),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Vacancy::from).collect())
    }

    /// Vacancies with neither salary bound set.
    pub async fn find_without_salary(&self) -> Result<Vec<Vacancy>> {
        let rows = Vacancies::find()
            .filter(Column::MinSalary.is_null())
            .filter(Column::MaxSalary.is_null())
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Vacancy::from).collect())
    }

    pub async fn find_by_link(&self, link: &str) -> Result<Option<Vacancy>> {
        let row = Vacancies::find()
            .filter(Column::Link.eq(link))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?;
        Ok(row.map(Vacancy::from))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Vacancies::find().count(&self.db).await?)
    }
}

#[async_trait]
impl VacancySink for DocumentSink {
    fn name(&self) -> &str {
        match self.mode {
            WriteMode::Insert => "db-insert",
            WriteMode::Upsert => "db-upsert",
        }
    }

    async fn write(&self, vacancies: &[Vacancy]) -> Result<usize> {
        match self.mode {
            WriteMode::Insert => self.insert_many(vacancies).await,
            WriteMode::Upsert => self.upsert(vacancies).await,
        }
    }
}
