use std::time::Duration;

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::extractor::{PageExtract, VacancyExtractor};
use crate::fetcher::Fetcher;
use crate::models::Vacancy;

/// Why pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Page `page` had no "next" control.
    LastPage { page: u32 },
    /// Page `page` could not be fetched after all retries. Earlier pages are kept.
    FetchFailed { page: u32, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages: u32,
    pub blocks: usize,
    pub skipped_blocks: usize,
    pub malformed: usize,
    pub unparsed_salaries: usize,
}

impl CrawlStats {
    fn absorb(&mut self, page: &PageExtract) {
        self.pages += 1;
        self.blocks += page.blocks;
        self.skipped_blocks += page.skipped_blocks;
        self.malformed += page.malformed;
        self.unparsed_salaries += page.unparsed_salaries;
    }
}

#[derive(Debug)]
pub struct CrawlOutcome {
    pub vacancies: Vec<Vacancy>,
    pub stop: StopReason,
    pub stats: CrawlStats,
}

impl CrawlOutcome {
    /// True when pagination ended on the site's own last page.
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::LastPage { .. })
    }
}

pub struct PageWalker<F> {
    fetcher: F,
    extractor: VacancyExtractor,
    start_url: String,
    page_delay: Duration,
}

impl<F: Fetcher> PageWalker<F> {
    pub fn new(fetcher: F, config: &CrawlConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: VacancyExtractor::new(&config.start_url, config.selectors)?,
            start_url: config.start_url.clone(),
            page_delay: config.page_delay,
        })
    }

    /// Walks result pages from `page=0` until the "next" control disappears or
    /// a page cannot be fetched. Records are returned in page order.
    #[tracing::instrument(skip(self), fields(start_url = %self.start_url))]
    pub async fn parse_all(&self, keyword: &str) -> CrawlOutcome {
        let mut vacancies = Vec::new();
        let mut stats = CrawlStats::default();
        let mut page: u32 = 0;

        let stop = loop {
            tracing::info!("Parse page: {}", page);
            let query = [("keywords", keyword.to_string()), ("page", page.to_string())];

            let html = match self.fetcher.fetch(&self.start_url, &query).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Stopping at page {}: {}", page, e);
                    break StopReason::FetchFailed {
                        page,
                        reason: e.to_string(),
                    };
                }
            };

            let extract = self.extractor.extract_page(&html);
            stats.absorb(&extract);
            vacancies.extend(extract.vacancies);

            tracing::info!("Parsing page: {} finished", page);
            tracing::info!("Vacancies found {}", vacancies.len());

            if !extract.has_next {
                break StopReason::LastPage { page };
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        };

        if stats.unparsed_salaries > 0 {
            tracing::warn!(
                "{} vacancies kept without salary: text matched no known layout",
                stats.unparsed_salaries
            );
        }

        CrawlOutcome {
            vacancies,
            stop,
            stats,
        }
    }
}
