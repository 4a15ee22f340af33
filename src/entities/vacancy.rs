use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::models::Vacancy;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "vacancies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub link: String, // natural key for upserts, not unique: insert mode appends
    pub title: String,
    pub city: String,
    pub company: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub currency: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn from_vacancy(vacancy: &Vacancy, scraped_at: DateTime<Utc>) -> Self {
        Self {
            link: Set(vacancy.link.clone()),
            title: Set(vacancy.title.clone()),
            city: Set(vacancy.city.clone()),
            company: Set(vacancy.company.clone()),
            min_salary: Set(vacancy.min_salary),
            max_salary: Set(vacancy.max_salary),
            currency: Set(vacancy.currency.clone()),
            period: Set(vacancy.period.clone()),
            description: Set(vacancy.description.clone()),
            scraped_at: Set(scraped_at),
            ..Default::default()
        }
    }
}

impl From<Model> for Vacancy {
    fn from(model: Model) -> Self {
        Vacancy {
            link: model.link,
            title: model.title,
            city: model.city,
            company: model.company,
            min_salary: model.min_salary,
            max_salary: model.max_salary,
            currency: model.currency,
            period: model.period,
            description: model.description,
        }
    }
}
