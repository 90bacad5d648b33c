//! Persistence seam. One trait, one method per entity operation, two
//! backends: PostgreSQL for production, an in-process map for tests and
//! local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Category, Claim, ClaimPatch, ContactMessage, ContactPatch, Department, District, Event,
    EventFilter, EventPatch, EventVerifier, Favorite, NewClaim, NewContactMessage, NewEvent,
    NewEventVerifier, NewFavorite, NewOrganizer, NewPurchase, NewPurchaseDetail, NewRating,
    NewReport, NewTicketType, NewUser, NewVerifier, Organizer, OrganizerPatch, Province, Purchase,
    PurchaseDetail, PurchaseFilter, Rating, RatingFilter, Report, ReportPatch, Ticket,
    TicketFilter, TicketPatch, TicketType, TicketTypePatch, User, UserPatch, Verifier,
    VerifierPatch,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    /// A uniqueness constraint rejected the write. Callers that care which
    /// constraint (ticket codes, favorite pairs, one-profile-per-user) know
    /// from the operation they attempted.
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit pagination, defaulting to the first hundred rows.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Page {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// Per-entity persistence operations.
///
/// Writes that can hit a uniqueness constraint (`create_user` on email,
/// `insert_ticket` on the redemption code, `create_favorite` /
/// `create_rating` on the (user, event) pair, profile creation on user id)
/// report [`StoreError::UniqueViolation`] distinguishably; the constraint in
/// the backend is the authoritative guarantee, not any pre-check.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(&self, new: &NewUser, password_hash: &str) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;
    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<User>;

    // Opaque bearer credentials, provisioned out of band.
    async fn create_api_token(&self, user_id: i64, token: &str) -> StoreResult<()>;
    async fn get_user_by_token(&self, token: &str) -> StoreResult<User>;

    // Lookup tables
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn list_departments(&self) -> StoreResult<Vec<Department>>;
    async fn list_provinces(&self, department_id: Option<i64>) -> StoreResult<Vec<Province>>;
    async fn list_districts(&self, province_id: Option<i64>) -> StoreResult<Vec<District>>;

    // Organizer profiles
    async fn create_organizer(&self, new: &NewOrganizer) -> StoreResult<Organizer>;
    async fn get_organizer(&self, id: i64) -> StoreResult<Organizer>;
    async fn get_organizer_by_user(&self, user_id: i64) -> StoreResult<Organizer>;
    async fn list_organizers(&self, page: Page) -> StoreResult<Vec<Organizer>>;
    async fn update_organizer(&self, id: i64, patch: &OrganizerPatch) -> StoreResult<Organizer>;

    // Verifier profiles
    async fn create_verifier(&self, new: &NewVerifier) -> StoreResult<Verifier>;
    async fn get_verifier(&self, id: i64) -> StoreResult<Verifier>;
    async fn get_verifier_by_user(&self, user_id: i64) -> StoreResult<Verifier>;
    async fn list_verifiers(&self, page: Page) -> StoreResult<Vec<Verifier>>;
    async fn update_verifier(&self, id: i64, patch: &VerifierPatch) -> StoreResult<Verifier>;

    // Events
    async fn create_event(&self, new: &NewEvent) -> StoreResult<Event>;
    async fn get_event(&self, id: i64) -> StoreResult<Event>;
    async fn list_events(&self, filter: EventFilter, page: Page) -> StoreResult<Vec<Event>>;
    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<Event>;
    async fn delete_event(&self, id: i64) -> StoreResult<()>;

    // Verifier assignments
    async fn create_event_verifier(&self, new: &NewEventVerifier) -> StoreResult<EventVerifier>;
    async fn get_event_verifier(&self, id: i64) -> StoreResult<EventVerifier>;
    async fn list_event_verifiers(
        &self,
        event_id: Option<i64>,
        verifier_id: Option<i64>,
    ) -> StoreResult<Vec<EventVerifier>>;
    async fn delete_event_verifier(&self, id: i64) -> StoreResult<()>;

    // Ticket types
    async fn create_ticket_type(&self, new: &NewTicketType) -> StoreResult<TicketType>;
    async fn get_ticket_type(&self, id: i64) -> StoreResult<TicketType>;
    async fn list_ticket_types(&self, event_id: Option<i64>) -> StoreResult<Vec<TicketType>>;
    async fn update_ticket_type(&self, id: i64, patch: &TicketTypePatch)
        -> StoreResult<TicketType>;
    async fn delete_ticket_type(&self, id: i64) -> StoreResult<()>;

    // Purchases
    async fn create_purchase(&self, new: &NewPurchase) -> StoreResult<Purchase>;
    async fn get_purchase(&self, id: i64) -> StoreResult<Purchase>;
    async fn list_purchases(&self, filter: PurchaseFilter, page: Page)
        -> StoreResult<Vec<Purchase>>;

    // Purchase details
    async fn create_purchase_detail(&self, new: &NewPurchaseDetail) -> StoreResult<PurchaseDetail>;
    async fn list_purchase_details(&self, purchase_id: i64) -> StoreResult<Vec<PurchaseDetail>>;

    // Tickets. `insert_ticket` is the single atomic check-and-claim for a
    // redemption code; a code collision comes back as `UniqueViolation`.
    async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket>;
    async fn get_ticket(&self, id: i64) -> StoreResult<Ticket>;
    async fn get_ticket_by_code(&self, code: &str) -> StoreResult<Ticket>;
    async fn list_tickets(&self, filter: TicketFilter, page: Page) -> StoreResult<Vec<Ticket>>;
    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> StoreResult<Ticket>;

    // Reports
    async fn create_report(&self, new: &NewReport) -> StoreResult<Report>;
    async fn get_report(&self, id: i64) -> StoreResult<Report>;
    async fn list_reports(&self, user_id: Option<i64>, page: Page) -> StoreResult<Vec<Report>>;
    async fn update_report(&self, id: i64, patch: &ReportPatch) -> StoreResult<Report>;

    // Contact messages
    async fn create_contact_message(
        &self,
        new: &NewContactMessage,
    ) -> StoreResult<ContactMessage>;
    async fn get_contact_message(&self, id: i64) -> StoreResult<ContactMessage>;
    async fn list_contact_messages(&self, page: Page) -> StoreResult<Vec<ContactMessage>>;
    async fn update_contact_message(
        &self,
        id: i64,
        patch: &ContactPatch,
    ) -> StoreResult<ContactMessage>;

    // Favorites
    async fn create_favorite(&self, new: &NewFavorite) -> StoreResult<Favorite>;
    async fn get_favorite(&self, id: i64) -> StoreResult<Favorite>;
    async fn find_favorite(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Favorite>>;
    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>>;
    async fn delete_favorite(&self, id: i64) -> StoreResult<()>;

    // Ratings
    async fn create_rating(&self, new: &NewRating) -> StoreResult<Rating>;
    async fn find_rating(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Rating>>;
    async fn list_ratings(&self, filter: RatingFilter) -> StoreResult<Vec<Rating>>;

    // Claims
    async fn create_claim(&self, new: &NewClaim) -> StoreResult<Claim>;
    async fn get_claim(&self, id: i64) -> StoreResult<Claim>;
    async fn list_claims(&self, page: Page) -> StoreResult<Vec<Claim>>;
    async fn update_claim(&self, id: i64, patch: &ClaimPatch) -> StoreResult<Claim>;
}
