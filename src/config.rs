use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CrawlError, Result};
use crate::extractor::Selectors;

pub const DEFAULT_START_URL: &str = "https://russia.superjob.ru/vacancy/search";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Network settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
    /// Total attempts per page, first try included.
    pub retry_number: u32,
    pub sleep_base: Duration,
    /// Upper bound (exclusive) of the random extra added to each retry sleep.
    pub jitter: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            timeout: Some(Duration::from_secs(10)),
            retry_number: 1,
            sleep_base: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_url: String,
    pub page_delay: Duration,
    pub selectors: Selectors,
    pub fetch: FetchConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            page_delay: Duration::from_secs(1),
            selectors: Selectors::default(),
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Snapshot,
    Csv,
    DbInsert,
    DbUpsert,
}

impl FromStr for SinkKind {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snapshot" | "json" => Ok(SinkKind::Snapshot),
            "csv" => Ok(SinkKind::Csv),
            "db-insert" => Ok(SinkKind::DbInsert),
            "db-upsert" => Ok(SinkKind::DbUpsert),
            other => Err(CrawlError::Config(format!("unknown sink: {}", other))),
        }
    }
}

pub const DEFAULT_SQLITE_URL: &str = "sqlite:./vacancies.sqlite?mode=rwc";

/// Document store connection, read from `DB_TYPE` / `DATABASE_URL`.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// `postgres` or anything else for sqlite.
    pub db_type: Option<String>,
    pub url: Option<String>,
}

impl DatabaseConfig {
    pub fn is_postgres(&self) -> bool {
        self.db_type.as_deref() == Some("postgres")
    }
}

#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub kinds: Vec<SinkKind>,
    pub snapshot_path: String,
    pub csv_path: String,
    pub database: DatabaseConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kinds: vec![SinkKind::Snapshot],
            snapshot_path: "vacancies.json".to_string(),
            csv_path: "vacancies.csv".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl SinkConfig {
    pub fn needs_database(&self) -> bool {
        self.kinds
            .iter()
            .any(|k| matches!(k, SinkKind::DbInsert | SinkKind::DbUpsert))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    pub sinks: SinkConfig,
}

impl AppConfig {
    /// Reads `.env` (if present), `VACANCY_*` and `DB_*`/`DATABASE_URL` variables
    /// over the defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        let crawl = &mut config.crawl;

        if let Some(url) = lookup("VACANCY_START_URL") {
            url::Url::parse(&url)?;
            crawl.start_url = url;
        }
        if let Some(agent) = lookup("VACANCY_USER_AGENT") {
            crawl.fetch.user_agent = agent;
        }
        crawl.fetch.proxy = lookup("VACANCY_PROXY").filter(|p| !p.trim().is_empty());
        if let Some(secs) = parse_var::<u64, _>(&lookup, "VACANCY_TIMEOUT_SECS")? {
            crawl.fetch.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(n) = parse_var::<u32, _>(&lookup, "VACANCY_RETRY_NUMBER")? {
            crawl.fetch.retry_number = n.max(1);
        }
        if let Some(secs) = parse_var::<f64, _>(&lookup, "VACANCY_RETRY_SLEEP_SECS")? {
            crawl.fetch.sleep_base = seconds(secs, "VACANCY_RETRY_SLEEP_SECS")?;
        }
        if let Some(secs) = parse_var::<f64, _>(&lookup, "VACANCY_PAGE_DELAY_SECS")? {
            crawl.page_delay = seconds(secs, "VACANCY_PAGE_DELAY_SECS")?;
        }

        if let Some(list) = lookup("VACANCY_SINKS") {
            let kinds = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(SinkKind::from_str)
                .collect::<Result<Vec<_>>>()?;
            if kinds.is_empty() {
                return Err(CrawlError::Config("VACANCY_SINKS is empty".to_string()));
            }
            config.sinks.kinds = kinds;
        }
        if let Some(path) = lookup("VACANCY_SNAPSHOT_PATH") {
            config.sinks.snapshot_path = path;
        }
        if let Some(path) = lookup("VACANCY_CSV_PATH") {
            config.sinks.csv_path = path;
        }
        config.sinks.database = DatabaseConfig {
            db_type: lookup("DB_TYPE").map(|t| t.trim().to_ascii_lowercase()),
            url: lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()),
        };

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| CrawlError::Config(format!("{} has invalid value {:?}", key, raw))),
    }
}

fn seconds(secs: f64, key: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| CrawlError::Config(format!("{} must be a non-negative number", key)))
}
