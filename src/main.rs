use std::env;
use std::io::{self, BufRead, Write};

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use vacancy_crawler::jobs::run_from_config;
use vacancy_crawler::AppConfig;

/// `--keyword <word>`, a bare positional word, or an interactive prompt.
fn read_keyword(args: &[String]) -> io::Result<String> {
    if let Some(pos) = args.iter().position(|a| a == "--keyword") {
        if let Some(word) = args.get(pos + 1) {
            return Ok(word.clone());
        }
    }
    if let Some(word) = args.iter().skip(1).find(|a| !a.starts_with("--")) {
        return Ok(word.clone());
    }

    print!("Type of keyword to search: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = AppConfig::from_env()?;
    let args: Vec<String> = env::args().collect();
    let keyword = read_keyword(&args)?;

    info!("Searching vacancies for {:?}", keyword);
    let report = run_from_config(&config, &keyword).await?;

    let failed = report.failed_sinks();
    if failed > 0 {
        error!("{} sink(s) failed", failed);
        return Err(format!("{} sink(s) failed", failed).into());
    }
    info!("Done: {} vacancies", report.outcome.vacancies.len());
    Ok(())
}
