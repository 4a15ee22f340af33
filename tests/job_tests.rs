mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::{listing, page, setup, temp_path};
use vacancy_crawler::jobs::{build_sinks, run_vacancy_crawl, SinkSet};
use vacancy_crawler::sinks::{load_snapshot, SnapshotSink, TabularSink, VacancySink};
use vacancy_crawler::{AppConfig, CrawlError, Fetcher, Result, StopReason};

struct TwoPages;

#[async_trait]
impl Fetcher for TwoPages {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let page_no = query
            .iter()
            .find(|(k, _)| *k == "page")
            .map(|(_, v)| v.as_str())
            .unwrap_or("0");
        match page_no {
            "0" => Ok(page(
                &[listing("/v/1.html", "Rust developer", Some("Acme"), "Вчера • Москва", "от 50 000 ₽/месяц")],
                true,
            )),
            "1" => Ok(page(
                &[listing("/v/2.html", "QA", None, "Вчера • Казань", "По договорённости")],
                false,
            )),
            _ => Err(CrawlError::FetchExhausted {
                url: url.to_string(),
                attempts: 1,
                reason: "unexpected page".to_string(),
            }),
        }
    }
}

#[tokio::test]
async fn test_crawl_writes_every_sink() {
    setup();
    let mut config = AppConfig::default();
    config.crawl.page_delay = Duration::ZERO;

    let json = temp_path("job.json");
    let csv = temp_path("job.csv");
    let sinks: Vec<Box<dyn VacancySink>> = vec![
        Box::new(SnapshotSink::new(&json)),
        Box::new(TabularSink::new(&csv)),
    ];

    let report = run_vacancy_crawl(TwoPages, &config, "rust", &sinks).await.unwrap();

    assert_eq!(report.outcome.stop, StopReason::LastPage { page: 1 });
    assert_eq!(report.failed_sinks(), 0);
    assert_eq!(report.sinks.len(), 2);

    let saved = load_snapshot(&json).unwrap();
    assert_eq!(saved, report.outcome.vacancies);
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].min_salary, Some(50000));
    assert_eq!(saved[1].description.as_deref(), Some("По договорённости"));

    let csv_rows = csv::Reader::from_path(&csv).unwrap().records().count();
    assert_eq!(csv_rows, 2);

    std::fs::remove_file(&json).ok();
    std::fs::remove_file(&csv).ok();
}

#[tokio::test]
async fn test_unreachable_database_only_fails_db_sinks() {
    setup();
    let json = temp_path("db-down.json");
    let json_str = json.to_string_lossy().to_string();
    let mut config = AppConfig::from_lookup(|key| match key {
        "VACANCY_SINKS" => Some("snapshot,db-upsert".to_string()),
        "VACANCY_SNAPSHOT_PATH" => Some(json_str.clone()),
        "DB_TYPE" => Some("sqlite".to_string()),
        "DATABASE_URL" => Some("sqlite:/nonexistent/dir/x.sqlite".to_string()),
        _ => None,
    })
    .unwrap();
    config.crawl.page_delay = Duration::ZERO;

    let SinkSet { sinks, unavailable } = build_sinks(&config).await;

    assert_eq!(unavailable.len(), 1);
    assert_eq!(unavailable[0].sink, "db-upsert");
    assert!(matches!(unavailable[0].outcome, Err(CrawlError::Database(_))));
    let names: Vec<_> = sinks.iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["snapshot"]);

    let mut report = run_vacancy_crawl(TwoPages, &config, "rust", &sinks).await.unwrap();
    report.sinks.extend(unavailable);
    assert_eq!(report.failed_sinks(), 1);
    assert_eq!(load_snapshot(&json).unwrap().len(), 2);

    std::fs::remove_file(&json).ok();
}
