use serde::{Deserialize, Serialize};

use crate::salary::SalaryShape;

/// One listing as it leaves the extractor. Salary fields are flat so that
/// every sink (JSON, CSV, SQL) sees the same columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub link: String,
    pub title: String,
    pub city: String,
    pub company: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub currency: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
}

/// Which of the mutually exclusive salary shapes a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryKind {
    Described,
    Numeric,
    Missing,
}

impl Vacancy {
    pub fn new(link: String, title: String, city: String, company: Option<String>) -> Self {
        Self {
            link,
            title,
            city,
            company,
            min_salary: None,
            max_salary: None,
            currency: None,
            period: None,
            description: None,
        }
    }

    /// Replaces every salary field with the ones implied by `shape`.
    pub fn with_salary(mut self, shape: SalaryShape) -> Self {
        self.min_salary = None;
        self.max_salary = None;
        self.currency = None;
        self.period = None;
        self.description = None;

        match shape {
            SalaryShape::Described { description } => {
                self.description = Some(description);
            }
            SalaryShape::RangeWithUnits { min, max, currency, period } => {
                self.min_salary = Some(min);
                self.max_salary = Some(max);
                self.currency = Some(currency);
                self.period = Some(period);
            }
            SalaryShape::BoundedFrom { min, currency, period } => {
                self.min_salary = Some(min);
                self.currency = Some(currency);
                self.period = Some(period);
            }
            SalaryShape::BoundedTo { max, currency, period } => {
                self.max_salary = Some(max);
                self.currency = Some(currency);
                self.period = Some(period);
            }
            SalaryShape::SingleValue { amount, currency, period } => {
                self.min_salary = Some(amount);
                self.max_salary = Some(amount);
                self.currency = Some(currency);
                self.period = Some(period);
            }
            SalaryShape::Unparsed => {}
        }
        self
    }

    pub fn salary_kind(&self) -> SalaryKind {
        if self.description.is_some() {
            SalaryKind::Described
        } else if self.min_salary.is_some() || self.max_salary.is_some() {
            SalaryKind::Numeric
        } else {
            SalaryKind::Missing
        }
    }
}
