// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod article;
pub mod config;
pub mod keywords;
pub mod similarity;
pub mod tags;

// Aggregation building blocks
pub mod cluster;
pub mod impact;
pub mod insight;
pub mod issues;
pub mod pins;
pub mod ranking;
pub mod rolling;
pub mod source_weights;

// Data collaborator + orchestration
pub mod report;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::article::{ArticleRecord, ArticleRef};
pub use crate::config::ReportConfig;
pub use crate::keywords::KeywordVocabulary;
pub use crate::report::{parse_keyword_list, CompetitorReport, ReportEngine};
pub use crate::source_weights::SourceWeights;
pub use crate::store::{ArticleStore, DateRange, MemoryStore, TagRow};
