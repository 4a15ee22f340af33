pub mod vacancy_crawl;

pub use vacancy_crawl::{build_sinks, run_from_config, run_vacancy_crawl, RunReport, SinkSet};
