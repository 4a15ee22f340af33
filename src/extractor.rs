use select::document::Document;
use select::node::Node;
use select::predicate::Name;
use url::Url;

use crate::error::{CrawlError, Result};
use crate::markup::{first, text_of, ClassSelector};
use crate::models::Vacancy;
use crate::salary::{normalize, SalaryShape};

/// Class hooks for one search-results page.
#[derive(Debug, Clone, Copy)]
pub struct Selectors {
    pub listing: ClassSelector,
    pub detail: ClassSelector,
    pub info: ClassSelector,
    pub company_block: ClassSelector,
    pub company_name: ClassSelector,
    pub location: ClassSelector,
    pub salary: ClassSelector,
    pub next_page: ClassSelector,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            listing: ClassSelector::new("div", &["f-test-search-result-item"]),
            detail: ClassSelector::new("div", &["Fo44F", "QiY08", "LvoDO"]),
            info: ClassSelector::new("div", &["jNMYr", "GPKTZ", "_1tH7S"]),
            company_block: ClassSelector::new("div", &["_3_eyK", "_3P0J7", "_9_FPy"]),
            company_name: ClassSelector::new("span", &["f-test-text-vacancy-item-company-name"]),
            location: ClassSelector::new("span", &["f-test-text-company-item-location"]),
            salary: ClassSelector::new("span", &["f-test-text-company-item-salary"]),
            next_page: ClassSelector::new("a", &["f-test-button-dalshe"]),
        }
    }
}

/// Everything pulled out of a single results page.
#[derive(Debug, Default)]
pub struct PageExtract {
    pub vacancies: Vec<Vacancy>,
    pub has_next: bool,
    pub blocks: usize,
    pub skipped_blocks: usize,
    pub malformed: usize,
    pub unparsed_salaries: usize,
}

pub struct VacancyExtractor {
    /// Start URL without query and without its last path segment.
    base_url: Url,
    selectors: Selectors,
}

impl VacancyExtractor {
    pub fn new(start_url: &str, selectors: Selectors) -> Result<Self> {
        let mut base_url = Url::parse(start_url)?;
        base_url.set_query(None);
        base_url.set_fragment(None);
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty().pop();
        }
        Ok(Self {
            base_url,
            selectors,
        })
    }

    /// Absolute hrefs are kept as is; anything else is appended to the base,
    /// so `/vakansii/x.html` under `.../vacancy/search` becomes
    /// `.../vacancy/vakansii/x.html`.
    fn resolve_link(&self, href: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute.to_string());
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, href.trim_start_matches('/'));
        Url::parse(&joined)
            .map(|url| url.to_string())
            .map_err(|_| CrawlError::MissingField("link"))
    }

    /// Extracts every listing on the page and checks for the "next" control.
    pub fn extract_page(&self, html: &str) -> PageExtract {
        let document = Document::from(html);
        let mut page = PageExtract::default();

        for block in document.find(self.selectors.listing) {
            page.blocks += 1;
            match self.extract(&block) {
                Ok(Some((vacancy, shape))) => {
                    if shape.is_unparsed() {
                        page.unparsed_salaries += 1;
                        tracing::warn!(link = %vacancy.link, "Salary text did not match any known layout");
                    }
                    page.vacancies.push(vacancy);
                }
                Ok(None) => page.skipped_blocks += 1,
                Err(e) if e.is_record_level() => {
                    page.malformed += 1;
                    tracing::warn!("Skipping listing: {}", e);
                }
                Err(e) => {
                    page.malformed += 1;
                    tracing::error!("Listing extraction failed: {}", e);
                }
            }
        }

        page.has_next = document.find(self.selectors.next_page).next().is_some();
        page
    }

    /// Maps one listing block to a vacancy. `Ok(None)` means the block is not
    /// a vacancy (ad placements have no detail sub-block).
    pub fn extract(&self, block: &Node) -> Result<Option<(Vacancy, SalaryShape)>> {
        let Some(detail) = first(block, self.selectors.detail) else {
            return Ok(None);
        };

        let info = first(&detail, self.selectors.info).ok_or(CrawlError::MissingField("info"))?;
        let anchor = info.find(Name("a")).next().ok_or(CrawlError::MissingField("title"))?;
        let href = anchor.attr("href").ok_or(CrawlError::MissingField("link"))?;
        let link = self.resolve_link(href.trim())?;
        let title = text_of(&anchor);

        let company_block = first(&detail, self.selectors.company_block);

        let location = company_block
            .as_ref()
            .and_then(|b| first(b, self.selectors.location))
            .map(|n| n.text())
            .ok_or(CrawlError::MissingField("location"))?;
        let city = parse_city(&location)?;

        let company = company_block
            .as_ref()
            .and_then(|b| first(b, self.selectors.company_name))
            .and_then(|n| n.find(Name("a")).next())
            .map(|a| text_of(&a));

        let shape = first(&info, self.selectors.salary)
            .map(|n| normalize(&n.text()))
            .unwrap_or(SalaryShape::Unparsed);

        let vacancy = Vacancy::new(link, title, city, company).with_salary(shape.clone());
        Ok(Some((vacancy, shape)))
    }
}

/// "Updated today • Москва, м. Арбатская" -> "Москва".
pub fn parse_city(location: &str) -> Result<String> {
    let segment = location
        .split('•')
        .nth(1)
        .ok_or_else(|| CrawlError::MalformedLocation(location.trim().to_string()))?;
    let city = segment.split(',').next().unwrap_or(segment);
    Ok(city.trim().to_string())
}
