pub mod elasticsearch;
pub mod google_docs;

pub use elasticsearch::ElasticsearchAdapter;
pub use google_docs::GoogleDocsSource;
