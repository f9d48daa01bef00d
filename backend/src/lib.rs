//! # EcoWeek - survey statistics for the UNAL sustainability campaign
//!
//! Reads the campaign's survey export, tallies the answers, and serves them
//! to the site together with the trivia game and community comments.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Analysis   │────▶│  Stats JSON │
//! │ (9 columns) │     │ (positional)│     │ (histograms)│     │  (HTTP/CLI) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ecoweek::{aggregate, parse};
//!
//! let text = "Timestamp,Recycling,Transport\n2025-01-01,Always,Bike\n2025-01-02,Never,Bike\n";
//! let result = aggregate(&parse(text));
//!
//! assert_eq!(result.total_responses, 2);
//! assert_eq!(result.transportation_stats["Bike"], 2);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Survey records, histograms, comments
//! - [`parser`] - CSV ingestion and export
//! - [`analysis`] - Frequency tables and percentages
//! - [`trivia`] - Trivia mini-game
//! - [`comments`] - Comment store interface
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Survey data
pub mod parser;
pub mod analysis;

// Site features
pub mod trivia;
pub mod comments;

// Runtime
pub mod config;
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CommentError, ConfigError, ServerError, SourceError, TriviaError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AggregationResult,
    Comment,
    CommentId,
    Histogram,
    NewComment,
    RankedEntry,
    SurveyResponse,
    COLUMNS,
    COLUMN_COUNT,
};

// =============================================================================
// Re-exports - Ingestion
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    inspect,
    load_bytes,
    load_source,
    parse,
    parse_header,
    split_line,
    to_csv,
    HeaderReport,
    SurveySource,
};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use analysis::{
    aggregate,
    percentage,
    percentage_full,
    ranked,
    top_environmental_issues,
    TOP_ISSUES,
};

// =============================================================================
// Re-exports - Trivia & Comments
// =============================================================================

pub use trivia::{feedback_message, AnswerOutcome, Category, Question, QuestionBank, TriviaGame};
pub use comments::{CommentStore, MemoryStore, SupabaseStore};

// =============================================================================
// Re-exports - Runtime
// =============================================================================

pub use config::AppConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
