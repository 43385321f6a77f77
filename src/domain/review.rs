use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_REASON: &str = "Inappropriate content";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub dish_id: String,
    /// Owner of the dish at the time of the review.
    pub cooker_id: String,
    pub order_id: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_image: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_reported: bool,
    pub reported_by: Option<String>,
    pub report_reason: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
    pub report_resolved: bool,
    pub report_action: Option<ReportAction>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewCreate {
    pub dish_id: String,
    pub cooker_id: String,
    pub order_id: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_image: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Admin decision on a reported review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    #[default]
    Dismiss,
    Remove,
}

/// Validates a client-supplied rating: a whole number from 1 to 5.
pub fn parse_rating(raw: f64) -> Option<u8> {
    if raw.fract() != 0.0 || !(1.0..=5.0).contains(&raw) {
        return None;
    }
    Some(raw as u8)
}
