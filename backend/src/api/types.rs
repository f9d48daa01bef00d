//! REST API types for the campaign site.
//!
//! Field names are camelCase, matching what the page scripts read.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::analysis::{aggregate, top_environmental_issues, TOP_ISSUES};
use crate::models::{AggregationResult, RankedEntry};
use crate::parser::{HeaderReport, SurveySource};
use crate::trivia::Category;

/// Survey statistics returned by `GET /api/stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Frequency tables, inlined at the top level
    #[serde(flatten)]
    pub stats: AggregationResult,

    /// Most reported environmental issues
    pub top_environmental_issues: Vec<RankedEntry>,

    /// Encoding the export was decoded with
    pub encoding: String,

    /// Layout diagnostics for the export
    pub header: HeaderReport,

    pub last_updated: DateTime<Utc>,
}

impl StatsResponse {
    pub fn from_source(source: SurveySource, last_updated: DateTime<Utc>) -> Self {
        let stats = aggregate(&source.records);
        let top_environmental_issues = top_environmental_issues(&stats, TOP_ISSUES);

        Self {
            stats,
            top_environmental_issues,
            encoding: source.encoding,
            header: source.header,
            last_updated,
        }
    }
}

/// Outcome of `POST /api/trivia/spin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResponse {
    /// Wheel position the spin landed on
    pub prize_number: usize,
    pub category: Category,
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
