use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub report_type: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub user_id: i64,
    pub report_type: String,
    pub description: String,
}

/// Moderation patch; only the status moves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
    pub status: Option<String>,
}

impl ReportPatch {
    pub fn apply(&self, report: &mut Report) {
        if let Some(v) = &self.status {
            report.status = v.clone();
        }
    }
}
