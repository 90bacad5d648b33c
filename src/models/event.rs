use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub district_id: i64,
    pub location_description: Option<String>,
    pub category_id: i64,
    /// Owning organizer profile.
    pub organizer_id: i64,
    /// User behind the organizer profile; ownership checks compare against
    /// this column.
    pub organizer_user_id: i64,
    pub image_url: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub district_id: i64,
    pub location_description: Option<String>,
    pub category_id: i64,
    pub organizer_id: i64,
    pub organizer_user_id: i64,
    pub image_url: Option<String>,
    #[serde(default = "default_event_status")]
    pub status: String,
}

fn default_event_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub district_id: Option<i64>,
    pub location_description: Option<String>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

impl EventPatch {
    pub fn apply(&self, event: &mut Event) {
        if let Some(v) = &self.title {
            event.title = v.clone();
        }
        if let Some(v) = &self.description {
            event.description = Some(v.clone());
        }
        if let Some(v) = self.start_date {
            event.start_date = v;
        }
        if let Some(v) = self.end_date {
            event.end_date = v;
        }
        if let Some(v) = self.district_id {
            event.district_id = v;
        }
        if let Some(v) = &self.location_description {
            event.location_description = Some(v.clone());
        }
        if let Some(v) = self.category_id {
            event.category_id = v;
        }
        if let Some(v) = &self.image_url {
            event.image_url = Some(v.clone());
        }
        if let Some(v) = &self.status {
            event.status = v.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EventFilter {
    pub category_id: Option<i64>,
    pub organizer_id: Option<i64>,
}

/// Assignment of a verifier profile to an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventVerifier {
    pub id: i64,
    pub verifier_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEventVerifier {
    pub verifier_id: i64,
    pub event_id: i64,
}
