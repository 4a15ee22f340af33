use sea_orm::DatabaseConnection;

use crate::config::{AppConfig, DatabaseConfig, SinkKind};
use crate::db;
use crate::error::{CrawlError, Result};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::sinks::{
    write_all, DocumentSink, SinkReport, SnapshotSink, TabularSink, VacancySink, WriteMode,
};
use crate::walker::{CrawlOutcome, PageWalker, StopReason};

#[derive(Debug)]
pub struct RunReport {
    pub outcome: CrawlOutcome,
    pub sinks: Vec<SinkReport>,
}

impl RunReport {
    pub fn failed_sinks(&self) -> usize {
        self.sinks.iter().filter(|r| r.outcome.is_err()).count()
    }
}

/// Sinks ready to receive records, plus the ones that could not be set up.
pub struct SinkSet {
    pub sinks: Vec<Box<dyn VacancySink>>,
    pub unavailable: Vec<SinkReport>,
}

/// Builds the configured sinks. A database connection is only opened when a
/// `db-*` sink is requested; if it fails only those sinks are dropped.
pub async fn build_sinks(config: &AppConfig) -> SinkSet {
    let mut set = SinkSet {
        sinks: Vec::new(),
        unavailable: Vec::new(),
    };

    let conn = if config.sinks.needs_database() {
        match open_database(&config.sinks.database).await {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::error!("Document store unavailable: {}", e);
                for kind in &config.sinks.kinds {
                    if matches!(kind, SinkKind::DbInsert | SinkKind::DbUpsert) {
                        set.unavailable.push(SinkReport {
                            sink: sink_name(*kind).to_string(),
                            outcome: Err(CrawlError::Database(e.to_string())),
                        });
                    }
                }
                None
            }
        }
    } else {
        None
    };

    for kind in &config.sinks.kinds {
        match (kind, &conn) {
            (SinkKind::Snapshot, _) => set
                .sinks
                .push(Box::new(SnapshotSink::new(&config.sinks.snapshot_path))),
            (SinkKind::Csv, _) => set
                .sinks
                .push(Box::new(TabularSink::new(&config.sinks.csv_path))),
            (SinkKind::DbInsert, Some(conn)) => set
                .sinks
                .push(Box::new(DocumentSink::new(conn.clone(), WriteMode::Insert))),
            (SinkKind::DbUpsert, Some(conn)) => set
                .sinks
                .push(Box::new(DocumentSink::new(conn.clone(), WriteMode::Upsert))),
            (SinkKind::DbInsert | SinkKind::DbUpsert, None) => {}
        }
    }
    set
}

async fn open_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let conn = db::connect(config).await?;
    db::ensure_schema(&conn).await?;
    Ok(conn)
}

fn sink_name(kind: SinkKind) -> &'static str {
    match kind {
        SinkKind::Snapshot => "snapshot",
        SinkKind::Csv => "csv",
        SinkKind::DbInsert => "db-insert",
        SinkKind::DbUpsert => "db-upsert",
    }
}

/// Crawls every result page for `keyword` and hands the records to `sinks`.
pub async fn run_vacancy_crawl<F: Fetcher>(
    fetcher: F,
    config: &AppConfig,
    keyword: &str,
    sinks: &[Box<dyn VacancySink>],
) -> Result<RunReport> {
    let walker = PageWalker::new(fetcher, &config.crawl)?;
    let outcome = walker.parse_all(keyword).await;

    match &outcome.stop {
        StopReason::LastPage { page } => tracing::info!(
            "Crawl finished at last page {}: {} vacancies",
            page,
            outcome.vacancies.len()
        ),
        StopReason::FetchFailed { page, reason } => tracing::error!(
            "Crawl truncated at page {} ({}); keeping {} vacancies from earlier pages",
            page,
            reason,
            outcome.vacancies.len()
        ),
    }
    tracing::info!(
        "Pages: {}, listings: {}, skipped: {}, malformed: {}, unparsed salaries: {}",
        outcome.stats.pages,
        outcome.stats.blocks,
        outcome.stats.skipped_blocks,
        outcome.stats.malformed,
        outcome.stats.unparsed_salaries
    );

    let reports = write_all(sinks, &outcome.vacancies).await;
    Ok(RunReport {
        outcome,
        sinks: reports,
    })
}

/// Production entry: HTTP fetcher and sinks from `config`.
pub async fn run_from_config(config: &AppConfig, keyword: &str) -> Result<RunReport> {
    let fetcher = HttpFetcher::new(config.crawl.fetch.clone())?;
    let SinkSet { sinks, unavailable } = build_sinks(config).await;
    let mut report = run_vacancy_crawl(fetcher, config, keyword, &sinks).await?;
    report.sinks.extend(unavailable);
    Ok(report)
}
