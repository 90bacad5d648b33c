use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Verifier profile, one per user at most; belongs to an organizer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Verifier {
    pub id: i64,
    pub user_id: i64,
    pub organizer_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVerifier {
    pub user_id: i64,
    pub organizer_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifierPatch {
    pub organizer_id: Option<i64>,
}

impl VerifierPatch {
    pub fn apply(&self, verifier: &mut Verifier) {
        if let Some(v) = self.organizer_id {
            verifier.organizer_id = v;
        }
    }
}
