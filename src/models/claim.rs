use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Complaint-book entry. Filed without authentication, moderated by
/// administrators only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub id: i64,
    pub first_names: String,
    pub last_names: String,
    pub document_type: String,
    pub document_number: String,
    pub address: String,
    pub district_id: i64,
    pub home_phone: Option<String>,
    pub mobile_phone: String,
    pub email: String,
    pub is_minor: bool,
    pub claim_amount: Option<Decimal>,
    pub service_type: String,
    pub product_service_description: String,
    pub claim_type: String,
    pub claim_detail: String,
    pub customer_request: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClaim {
    pub first_names: String,
    pub last_names: String,
    pub document_type: String,
    pub document_number: String,
    pub address: String,
    pub district_id: i64,
    pub home_phone: Option<String>,
    pub mobile_phone: String,
    pub email: String,
    #[serde(default)]
    pub is_minor: bool,
    pub claim_amount: Option<Decimal>,
    pub service_type: String,
    pub product_service_description: String,
    pub claim_type: String,
    pub claim_detail: String,
    pub customer_request: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimPatch {
    pub status: Option<String>,
}

impl ClaimPatch {
    pub fn apply(&self, claim: &mut Claim) {
        if let Some(v) = &self.status {
            claim.status = v.clone();
        }
    }
}
