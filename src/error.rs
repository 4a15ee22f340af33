use std::fmt;

#[derive(Debug)]
pub enum CrawlError {
    /// Every attempt for a page failed; the walker treats this as the end of pagination.
    FetchExhausted {
        url: String,
        attempts: u32,
        reason: String,
    },
    MalformedLocation(String),
    MissingField(&'static str),
    Io(String),
    Csv(String),
    Serialization(String),
    Database(String),
    Config(String),
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlError::FetchExhausted { url, attempts, reason } => write!(
                f,
                "Fetch failed for {} after {} attempt(s): {}",
                url, attempts, reason
            ),
            CrawlError::MalformedLocation(text) => write!(f, "Malformed location: {:?}", text),
            CrawlError::MissingField(field) => write!(f, "Listing is missing field: {}", field),
            CrawlError::Io(msg) => write!(f, "I/O error: {}", msg),
            CrawlError::Csv(msg) => write!(f, "CSV error: {}", msg),
            CrawlError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CrawlError::Database(msg) => write!(f, "Database error: {}", msg),
            CrawlError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CrawlError {}

impl CrawlError {
    /// Errors that only invalidate a single listing block.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            CrawlError::MalformedLocation(_) | CrawlError::MissingField(_)
        )
    }
}

impl From<std::io::Error> for CrawlError {
    fn from(err: std::io::Error) -> Self {
        CrawlError::Io(err.to_string())
    }
}

impl From<csv::Error> for CrawlError {
    fn from(err: csv::Error) -> Self {
        CrawlError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for CrawlError {
    fn from(err: serde_json::Error) -> Self {
        CrawlError::Serialization(err.to_string())
    }
}

impl From<sea_orm::DbErr> for CrawlError {
    fn from(err: sea_orm::DbErr) -> Self {
        CrawlError::Database(err.to_string())
    }
}

impl From<url::ParseError> for CrawlError {
    fn from(err: url::ParseError) -> Self {
        CrawlError::Config(format!("invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
