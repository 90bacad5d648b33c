use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Organizer profile, one per user at most.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organizer {
    pub id: i64,
    pub user_id: i64,
    pub document_type: String,
    pub document_number: String,
    pub business_name: Option<String>,
    pub ruc: Option<String>,
    pub work_certificate_file: Option<String>,
    pub is_approved: bool,
    pub approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrganizer {
    pub user_id: i64,
    pub document_type: String,
    pub document_number: String,
    pub business_name: Option<String>,
    pub ruc: Option<String>,
    pub work_certificate_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizerPatch {
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub business_name: Option<String>,
    pub ruc: Option<String>,
    pub work_certificate_file: Option<String>,
    pub is_approved: Option<bool>,
}

impl OrganizerPatch {
    pub fn apply(&self, organizer: &mut Organizer) {
        if let Some(v) = &self.document_type {
            organizer.document_type = v.clone();
        }
        if let Some(v) = &self.document_number {
            organizer.document_number = v.clone();
        }
        if let Some(v) = &self.business_name {
            organizer.business_name = Some(v.clone());
        }
        if let Some(v) = &self.ruc {
            organizer.ruc = Some(v.clone());
        }
        if let Some(v) = &self.work_certificate_file {
            organizer.work_certificate_file = Some(v.clone());
        }
        if let Some(v) = self.is_approved {
            organizer.is_approved = v;
        }
    }
}
