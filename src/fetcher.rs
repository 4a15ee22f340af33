use std::time::Duration;

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::future::retry_notify;
use backoff::Error as BackoffError;
use rand::Rng;
use reqwest::{Client, StatusCode};

use crate::config::FetchConfig;
use crate::error::{CrawlError, Result};

/// Source of raw result-page markup.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GETs `url` with `query` appended and returns the response body.
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for &T {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        (**self).fetch(url, query).await
    }
}

/// Constant sleep plus uniform jitter, giving up after a fixed number of retries.
#[derive(Debug, Clone)]
pub struct JitteredRetry {
    base: Duration,
    jitter: Duration,
    retries: u32,
    remaining: u32,
}

impl JitteredRetry {
    pub fn new(base: Duration, jitter: Duration, attempts: u32) -> Self {
        let retries = attempts.max(1) - 1;
        Self {
            base,
            jitter,
            retries,
            remaining: retries,
        }
    }
}

impl Backoff for JitteredRetry {
    fn reset(&mut self) {
        self.remaining = self.retries;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let extra = self.jitter.mul_f64(rand::thread_rng().gen_range(0.0..1.0));
        Some(self.base + extra)
    }
}

fn retry_notify_handler<E>(err: E, duration: Duration)
where
    E: std::fmt::Display,
{
    tracing::warn!(
        "Request failed: {}. Retrying in {:.1}s...",
        err,
        duration.as_secs_f32()
    );
}

pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        // Only the configured proxy is used, never one picked up from the environment.
        match &config.proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy)
                    .map_err(|e| CrawlError::Config(format!("invalid proxy {}: {}", proxy, e)))?;
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }
        let client = builder
            .build()
            .map_err(|e| CrawlError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[tracing::instrument(skip(self, url, query), fields(url = %url))]
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let backoff = JitteredRetry::new(
            self.config.sleep_base,
            self.config.jitter,
            self.config.retry_number,
        );
        let client = &self.client;
        let mut attempts = 0u32;

        let outcome = retry_notify(
            backoff,
            || {
                attempts += 1;
                async move {
                    // Every failure is retried: timeouts, proxy and connection
                    // errors, and any status other than 200.
                    let resp = client
                        .get(url)
                        .query(query)
                        .send()
                        .await
                        .map_err(|e| BackoffError::transient(anyhow::Error::new(e)))?;
                    let status = resp.status();
                    if status != StatusCode::OK {
                        tracing::debug!("Retrying on status: {}", status);
                        return Err(BackoffError::transient(anyhow::anyhow!(
                            "Server returned status: {}",
                            status
                        )));
                    }
                    resp.text()
                        .await
                        .map_err(|e| BackoffError::transient(anyhow::Error::new(e)))
                }
            },
            retry_notify_handler,
        )
        .await;

        outcome.map_err(|e| CrawlError::FetchExhausted {
            url: url.to_string(),
            attempts,
            reason: e.to_string(),
        })
    }
}
