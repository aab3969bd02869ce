use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// Raised once at startup from [`Config::validate`](crate::config::Config::validate);
/// never surfaced per-request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Caller mistakes that are surfaced immediately and never retried.
#[derive(Error, Debug, Clone)]
pub enum InputError {
    #[error("topic '{topic_id}' not found for owner '{owner_id}'")]
    TopicNotFound { topic_id: String, owner_id: String },

    #[error("job '{job_id}' not found")]
    JobNotFound { job_id: String },

    #[error("owner id must not be empty")]
    EmptyOwner,
}

/// Transient storage failures from the relational store.
///
/// Document reads abort the surrounding job; metric snapshot writes are
/// logged and swallowed by the aggregator.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("failed to read from store: {0}")]
    Read(String),

    #[error("failed to write to store: {0}")]
    Write(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Cache backend failures.
///
/// These always degrade to direct computation inside
/// [`TieredCache`](crate::cache::TieredCache) and must never reach a caller
/// as a hard failure.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("failed to serialize cached value: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to deserialize cached value: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Scoring or aggregation failures for a single topic.
///
/// Caught per-topic in bulk jobs so one bad topic cannot fail the batch.
#[derive(Error, Debug, Clone)]
pub enum ComputationError {
    #[error("scoring produced a non-finite value for topic '{topic_id}'")]
    NonFiniteScore { topic_id: String },

    #[error("scoring failed: {0}")]
    Scorer(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Human-readable message safe to store on a failed job record.
    ///
    /// Job status records are polled by external callers, so the message
    /// must not leak internals beyond the error display itself.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.to_string()
    }
}
