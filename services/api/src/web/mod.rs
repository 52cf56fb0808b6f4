pub mod rest;
pub mod state;

// Re-export the handlers and router so the binary can assemble the server.
pub use rest::{api_router, ingest_handler, search_handler};
pub use state::AppState;
