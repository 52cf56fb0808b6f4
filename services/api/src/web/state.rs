//! services/api/src/web/state.rs
//!
//! Defines the application state shared by all handlers.

use crate::config::Config;
use faq_retrieval_core::ports::{DocumentSource, SearchEngine};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing here changes after startup. In particular the name of the last
/// ingested index is not kept; clients pass it to `/search` themselves.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn DocumentSource>,
    pub engine: Arc<dyn SearchEngine>,
}
