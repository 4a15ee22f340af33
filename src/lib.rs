//! Crawls a paginated job-listing site, normalizes salary text, and hands the
//! resulting vacancies to one or more sinks.

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod jobs;
pub mod markup;
pub mod models;
pub mod salary;
pub mod sinks;
pub mod walker;

pub use config::{AppConfig, CrawlConfig, DatabaseConfig, FetchConfig, SinkConfig, SinkKind};
pub use error::{CrawlError, Result};
pub use extractor::{Selectors, VacancyExtractor};
pub use fetcher::{Fetcher, HttpFetcher};
pub use models::{SalaryKind, Vacancy};
pub use salary::{normalize, SalaryShape};
pub use walker::{CrawlOutcome, CrawlStats, PageWalker, StopReason};
