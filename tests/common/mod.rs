#![allow(dead_code)]

use std::sync::Once;

use vacancy_crawler::Vacancy;

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

pub const START_URL: &str = "https://russia.superjob.ru/vacancy/search";

/// One listing block in the markup the results page uses.
pub fn listing(href: &str, title: &str, company: Option<&str>, location: &str, salary: &str) -> String {
    let company = company
        .map(|name| {
            format!(
                r#"<span class="_3Fsn4 f-test-text-vacancy-item-company-name _1_OKi"><a href="/clients/{name}">{name}</a></span>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="f-test-search-result-item">
  <div class="Fo44F QiY08 LvoDO">
    <div class="jNMYr GPKTZ _1tH7S">
      <span class="_2J-3z"><a class="_1IHWd" href="{href}">{title}</a></span>
      <span class="_1OuF_ _1qw9T f-test-text-company-item-salary">{salary}</span>
    </div>
    <div class="_3_eyK _3P0J7 _9_FPy">
      {company}
      <span class="f-test-text-company-item-location _1_OKi _3DjcL">{location}</span>
    </div>
  </div>
</div>"#
    )
}

/// A block with no detail sub-block, as used for banner placements.
pub fn ad_block() -> String {
    r#"<div class="f-test-search-result-item"><div class="banner">Реклама</div></div>"#.to_string()
}

pub fn page(listings: &[String], has_next: bool) -> String {
    let next = if has_next {
        r#"<a class="icMQ_ bs_sM _3ze9n l9LnJ f-test-button-dalshe f-test-link-Dalshe" href="?page=1">Дальше</a>"#
    } else {
        ""
    };
    format!(
        "<html><body><div class=\"results\">{}</div>{}</body></html>",
        listings.join("\n"),
        next
    )
}

pub fn vacancy(link: &str, title: &str) -> Vacancy {
    Vacancy::new(
        link.to_string(),
        title.to_string(),
        "Москва".to_string(),
        Some("Acme".to_string()),
    )
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "vacancy-crawler-{}-{}-{}",
        std::process::id(),
        nanos,
        name
    ))
}
