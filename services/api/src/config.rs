//! services/api/src/config.rs
//!
//! Defines the service configuration and how it is loaded.
//!
//! All configuration comes from environment variables at startup. A `.env`
//! file is read for local development. Every option has a default; the
//! defaults target the docker-compose setup (an `elasticsearch` host and the
//! `llm-zoomcamp` course).

use faq_retrieval_core::pipeline::{CourseSource, IngestOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub elasticsearch_url: String,
    pub http_timeout: Duration,
    pub index_name_prefix: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    pub default_query: String,
    pub top_k: usize,
    pub chunk_field: String,
    pub course_filter: String,
    /// Courses to ingest, with the Google Docs id of each FAQ.
    pub faq_documents: Vec<CourseSource>,
}

const DEFAULT_FAQ_DOCUMENTS: &str = "llm-zoomcamp=1T3MdwUvqCL3jrh3d3VCXQ8xE0UqRzI3bfgpfBq3ZWG0";

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Server and logging ---
        let bind_address = parse_var(&lookup, "BIND_ADDRESS", "0.0.0.0:3000")?;
        let log_level = parse_var(&lookup, "RUST_LOG", "INFO")?;

        // --- Search engine connection and index settings ---
        let elasticsearch_url = text("ELASTICSEARCH_URL", "http://elasticsearch:9200");
        let http_timeout = Duration::from_secs(parse_var(&lookup, "HTTP_TIMEOUT_SECS", "30")?);
        let index_name_prefix = text("INDEX_NAME_PREFIX", "documents");
        let number_of_shards = parse_var(&lookup, "NUMBER_OF_SHARDS", "1")?;
        let number_of_replicas = parse_var(&lookup, "NUMBER_OF_REPLICAS", "0")?;

        // --- Query defaults ---
        let default_query = text("DEFAULT_QUERY", "When is the next cohort?");
        let top_k: usize = parse_var(&lookup, "TOP_K", "5")?;
        if top_k == 0 {
            return Err(ConfigError::InvalidValue(
                "TOP_K".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let chunk_field = text("CHUNK_FIELD", "text");
        let course_filter = text("COURSE_FILTER", "llm-zoomcamp");

        // --- Ingestion sources ---
        let faq_documents = parse_faq_documents(&text("FAQ_DOCUMENTS", DEFAULT_FAQ_DOCUMENTS))?;

        Ok(Self {
            bind_address,
            log_level,
            elasticsearch_url: elasticsearch_url.trim_end_matches('/').to_string(),
            http_timeout,
            index_name_prefix,
            number_of_shards,
            number_of_replicas,
            default_query,
            top_k,
            chunk_field,
            course_filter,
            faq_documents,
        })
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            index_name_prefix: self.index_name_prefix.clone(),
            number_of_shards: self.number_of_shards,
            number_of_replicas: self.number_of_replicas,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<T>().map_err(|e| {
        ConfigError::InvalidValue(key.to_string(), format!("'{}' ({})", raw, e))
    })
}

/// Parses `course=file_id` pairs separated by commas.
fn parse_faq_documents(raw: &str) -> Result<Vec<CourseSource>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("FAQ_DOCUMENTS".to_string(), reason);

    let mut sources = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (course, source_id) = pair
            .split_once('=')
            .ok_or_else(|| invalid(format!("'{}' is not a course=file_id pair", pair)))?;
        let (course, source_id) = (course.trim(), source_id.trim());
        if course.is_empty() || source_id.is_empty() {
            return Err(invalid(format!("'{}' has an empty course or file id", pair)));
        }
        sources.push(CourseSource {
            course: course.to_string(),
            source_id: source_id.to_string(),
        });
    }

    if sources.is_empty() {
        return Err(invalid("no courses configured".to_string()));
    }
    Ok(sources)
}
