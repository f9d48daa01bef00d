//! Domain models for the EcoWeek backend.
//!
//! - [`SurveyResponse`] - one respondent's answers, positional and untyped
//! - [`AggregationResult`] - frequency tables over six survey dimensions
//! - [`RankedEntry`] - one histogram row prepared for display
//! - [`Comment`] / [`NewComment`] - community comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Survey Response
// =============================================================================

/// Number of logical columns in the survey export.
pub const COLUMN_COUNT: usize = 9;

/// Canonical header of the survey export, in column order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Timestamp",
    "Recycling frequency",
    "Transportation",
    "Water conservation",
    "Eco-friendly payment",
    "Environmental issues",
    "Bring own container",
    "Justification",
    "Consent",
];

/// One respondent's submission.
///
/// Every field is the raw string found at a fixed column position.
/// Nothing is validated or coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub timestamp: String,
    pub consent: String,
    pub recycling_frequency: String,
    pub transportation: String,
    /// Semicolon-separated practices.
    pub water_conservation: String,
    pub eco_friendly_payment: String,
    /// Semicolon-separated issues.
    pub environmental_issues: String,
    pub bring_own_container: String,
    pub justification: String,
}

impl SurveyResponse {
    /// Build a response from positional fields.
    ///
    /// Missing trailing fields become empty strings, extra fields are dropped.
    pub fn from_fields(fields: Vec<String>) -> Self {
        let mut it = fields.into_iter();
        let mut next = || it.next().unwrap_or_default();

        // Column order: 0 timestamp .. 8 consent
        let timestamp = next();
        let recycling_frequency = next();
        let transportation = next();
        let water_conservation = next();
        let eco_friendly_payment = next();
        let environmental_issues = next();
        let bring_own_container = next();
        let justification = next();
        let consent = next();

        Self {
            timestamp,
            consent,
            recycling_frequency,
            transportation,
            water_conservation,
            eco_friendly_payment,
            environmental_issues,
            bring_own_container,
            justification,
        }
    }

    /// Fields in export column order.
    pub fn fields(&self) -> [&str; COLUMN_COUNT] {
        [
            &self.timestamp,
            &self.recycling_frequency,
            &self.transportation,
            &self.water_conservation,
            &self.eco_friendly_payment,
            &self.environmental_issues,
            &self.bring_own_container,
            &self.justification,
            &self.consent,
        ]
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Answer value to number of occurrences.
pub type Histogram = BTreeMap<String, u64>;

/// Frequency tables computed from a set of responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub total_responses: u64,
    pub recycling_stats: Histogram,
    pub transportation_stats: Histogram,
    pub payment_willingness: Histogram,
    pub container_willingness: Histogram,
    pub water_conservation_stats: Histogram,
    pub environmental_issues: Histogram,
}

/// A histogram row with its share of all responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub label: String,
    pub count: u64,
    /// Rounded percentage of total responses.
    pub percentage: u32,
}

// =============================================================================
// Comments
// =============================================================================

/// Primary key of a stored comment.
///
/// Tables keyed by `uuid` and by `bigint` identity are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    Int(i64),
    Uuid(Uuid),
}

impl CommentId {
    pub fn new_v4() -> Self {
        CommentId::Uuid(Uuid::new_v4())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentId::Int(id) => write!(f, "{}", id),
            CommentId::Uuid(id) => write!(f, "{}", id),
        }
    }
}

/// A stored community comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A comment as submitted through the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_fields_positional() {
        let r = SurveyResponse::from_fields(strings(&[
            "2025-01-01", "Always", "Bike", "Fix leaks", "Yes", "Plastic", "No", "Because", "Yes",
        ]));

        assert_eq!(r.timestamp, "2025-01-01");
        assert_eq!(r.recycling_frequency, "Always");
        assert_eq!(r.transportation, "Bike");
        assert_eq!(r.water_conservation, "Fix leaks");
        assert_eq!(r.eco_friendly_payment, "Yes");
        assert_eq!(r.environmental_issues, "Plastic");
        assert_eq!(r.bring_own_container, "No");
        assert_eq!(r.justification, "Because");
        assert_eq!(r.consent, "Yes");
    }

    #[test]
    fn test_from_fields_short_row_defaults() {
        let r = SurveyResponse::from_fields(strings(&["2025-01-01", "Never"]));

        assert_eq!(r.recycling_frequency, "Never");
        assert_eq!(r.transportation, "");
        assert_eq!(r.consent, "");
    }

    #[test]
    fn test_from_fields_extra_columns_dropped() {
        let mut values = vec!["x"; 12];
        values[8] = "consent";
        let r = SurveyResponse::from_fields(strings(&values));

        assert_eq!(r.consent, "consent");
        assert_eq!(r.fields().len(), COLUMN_COUNT);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(AggregationResult::default()).unwrap();
        assert_eq!(json["totalResponses"], 0);
        assert!(json["waterConservationStats"].is_object());
    }

    #[test]
    fn test_comment_id_accepts_integer_and_uuid() {
        let int: CommentId = serde_json::from_str("42").unwrap();
        assert_eq!(int, CommentId::Int(42));
        assert_eq!(int.to_string(), "42");
        assert_eq!(serde_json::to_string(&int).unwrap(), "42");

        let raw = "\"0b9e6c2a-2f5e-4c1d-9a57-1f1e7c3d8a10\"";
        let uuid: CommentId = serde_json::from_str(raw).unwrap();
        assert!(matches!(uuid, CommentId::Uuid(_)));
        assert_eq!(serde_json::to_string(&uuid).unwrap(), raw);
    }
}
