mod common;

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use common::{listing, page, setup, START_URL};
use vacancy_crawler::{CrawlConfig, CrawlError, Fetcher, PageWalker, Result, StopReason};

/// Serves canned pages by the `page` query parameter and records each call.
struct StubFetcher {
    pages: Vec<String>,
    fail_from: Option<u32>,
    calls: Mutex<Vec<(String, String, u32)>>,
}

impl StubFetcher {
    fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            fail_from: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let keyword = query
            .iter()
            .find(|(k, _)| *k == "keywords")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let page: u32 = query
            .iter()
            .find(|(k, _)| *k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .expect("page parameter");
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), keyword, page));

        if self.fail_from.is_some_and(|from| page >= from) {
            return Err(CrawlError::FetchExhausted {
                url: url.to_string(),
                attempts: 3,
                reason: "connection reset".to_string(),
            });
        }
        self.pages
            .get(page as usize)
            .cloned()
            .ok_or_else(|| CrawlError::FetchExhausted {
                url: url.to_string(),
                attempts: 1,
                reason: "no such page".to_string(),
            })
    }
}

fn config() -> CrawlConfig {
    CrawlConfig {
        page_delay: Duration::ZERO,
        ..CrawlConfig::default()
    }
}

fn result_page(page_no: u32, count: u32, has_next: bool) -> String {
    let listings: Vec<String> = (0..count)
        .map(|i| {
            listing(
                &format!("/v/{}-{}.html", page_no, i),
                &format!("Job {}-{}", page_no, i),
                Some("Acme"),
                "Вчера • Москва",
                "60000 руб. в месяц",
            )
        })
        .collect();
    page(&listings, has_next)
}

#[tokio::test]
async fn test_walks_until_next_control_disappears() {
    setup();
    let pages = vec![
        result_page(0, 2, true),
        result_page(1, 3, true),
        result_page(2, 1, false),
    ];
    let walker = PageWalker::new(StubFetcher::new(pages), &config()).unwrap();

    let outcome = walker.parse_all("rust").await;

    assert_eq!(outcome.stop, StopReason::LastPage { page: 2 });
    assert!(outcome.is_complete());
    assert_eq!(outcome.stats.pages, 3);

    let titles: Vec<&str> = outcome.vacancies.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Job 0-0", "Job 0-1", "Job 1-0", "Job 1-1", "Job 1-2", "Job 2-0"]
    );
}

#[tokio::test]
async fn test_fetches_each_page_once_in_order() {
    let fetcher = StubFetcher::new(vec![
        result_page(0, 1, true),
        result_page(1, 1, true),
        result_page(2, 1, true),
        result_page(3, 1, false),
    ]);
    let walker = PageWalker::new(&fetcher, &config()).unwrap();
    let outcome = walker.parse_all("data engineer").await;
    assert_eq!(outcome.vacancies.len(), 4);

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 4);
    for (i, (url, keyword, page)) in calls.iter().enumerate() {
        assert_eq!(url, START_URL);
        assert_eq!(keyword, "data engineer");
        assert_eq!(*page, i as u32);
    }
}

#[tokio::test]
async fn test_fetch_failure_stops_and_keeps_earlier_pages() {
    let mut fetcher = StubFetcher::new(vec![
        result_page(0, 2, true),
        result_page(1, 2, true),
        result_page(2, 2, false),
    ]);
    fetcher.fail_from = Some(1);
    let walker = PageWalker::new(&fetcher, &config()).unwrap();

    let outcome = walker.parse_all("rust").await;

    assert!(!outcome.is_complete());
    match &outcome.stop {
        StopReason::FetchFailed { page, reason } => {
            assert_eq!(*page, 1);
            assert!(reason.contains("connection reset"));
        }
        other => panic!("expected FetchFailed, got {:?}", other),
    }
    assert_eq!(outcome.vacancies.len(), 2);
    assert_eq!(outcome.stats.pages, 1);
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_first_page_failure_yields_empty_outcome() {
    let mut fetcher = StubFetcher::new(vec![]);
    fetcher.fail_from = Some(0);
    let walker = PageWalker::new(&fetcher, &config()).unwrap();

    let outcome = walker.parse_all("rust").await;
    assert!(outcome.vacancies.is_empty());
    assert!(matches!(outcome.stop, StopReason::FetchFailed { page: 0, .. }));
}

#[tokio::test]
async fn test_stats_accumulate_across_pages() {
    let first = page(
        &[
            common::ad_block(),
            listing("/v/a.html", "A", None, "Москва", "60000 руб. в месяц"),
            listing("/v/b.html", "B", None, "Вчера • Москва", "около 1 в год"),
        ],
        true,
    );
    let second = result_page(1, 2, false);
    let fetcher = StubFetcher::new(vec![first, second]);
    let walker = PageWalker::new(&fetcher, &config()).unwrap();

    let outcome = walker.parse_all("rust").await;
    assert_eq!(outcome.stats.pages, 2);
    assert_eq!(outcome.stats.blocks, 5);
    assert_eq!(outcome.stats.skipped_blocks, 1);
    assert_eq!(outcome.stats.malformed, 1);
    assert_eq!(outcome.stats.unparsed_salaries, 1);
    assert_eq!(outcome.vacancies.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sleeps_between_pages_only() {
    let fetcher = StubFetcher::new(vec![result_page(0, 1, true), result_page(1, 1, false)]);
    let cfg = CrawlConfig {
        page_delay: Duration::from_secs(1),
        ..CrawlConfig::default()
    };
    let walker = PageWalker::new(&fetcher, &cfg).unwrap();

    let started = tokio::time::Instant::now();
    walker.parse_all("rust").await;
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}
