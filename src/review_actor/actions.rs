use chrono::{DateTime, Utc};

use crate::domain::ReportAction;

/// Moderation actions for Review entities.
#[derive(Debug, Clone)]
pub enum ReviewAction {
    Report {
        reported_by: String,
        reason: String,
        at: DateTime<Utc>,
    },
    /// Closes a report without removing the review.
    Resolve {
        action: ReportAction,
        resolved_by: String,
        at: DateTime<Utc>,
    },
}
