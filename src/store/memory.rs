//! In-process backend. Enforces the same uniqueness constraints as the
//! PostgreSQL schema so policy and issuance behave identically under test.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{
    Category, Claim, ClaimPatch, ContactMessage, ContactPatch, Department, District, Event,
    EventFilter, EventPatch, EventVerifier, Favorite, NewClaim, NewContactMessage, NewEvent,
    NewEventVerifier, NewFavorite, NewOrganizer, NewPurchase, NewPurchaseDetail, NewRating,
    NewReport, NewTicketType, NewUser, NewVerifier, Organizer, OrganizerPatch, Province, Purchase,
    PurchaseDetail, PurchaseFilter, Rating, RatingFilter, Report, ReportPatch, Ticket,
    TicketFilter, TicketPatch, TicketStatus, TicketType, TicketTypePatch, User, UserPatch,
    Verifier, VerifierPatch,
};
use crate::store::{Page, Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    api_tokens: HashMap<String, i64>,
    categories: Vec<Category>,
    departments: Vec<Department>,
    provinces: Vec<Province>,
    districts: Vec<District>,
    organizers: Vec<Organizer>,
    verifiers: Vec<Verifier>,
    events: Vec<Event>,
    event_verifiers: Vec<EventVerifier>,
    ticket_types: Vec<TicketType>,
    purchases: Vec<Purchase>,
    purchase_details: Vec<PurchaseDetail>,
    tickets: Vec<Ticket>,
    reports: Vec<Report>,
    contact_messages: Vec<ContactMessage>,
    favorites: Vec<Favorite>,
    ratings: Vec<Rating>,
    claims: Vec<Claim>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

fn paginate<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    // ── Users ────────────────────────────────────────────────────────────

    async fn create_user(&self, new: &NewUser, password_hash: &str) -> StoreResult<User> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation);
        }
        let user = User {
            id: tables.next_id(),
            first_names: new.first_names.clone(),
            last_names: new.last_names.clone(),
            email: new.email.clone(),
            password_hash: password_hash.to_string(),
            phone: new.phone.clone(),
            gender: new.gender.clone(),
            avatar_url: new.avatar_url.clone(),
            role: new.role,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let tables = self.lock()?;
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let tables = self.lock()?;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        let tables = self.lock()?;
        Ok(paginate(tables.users.iter().cloned(), page))
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn create_api_token(&self, user_id: i64, token: &str) -> StoreResult<()> {
        let mut tables = self.lock()?;
        if tables.api_tokens.contains_key(token) {
            return Err(StoreError::UniqueViolation);
        }
        tables.api_tokens.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn get_user_by_token(&self, token: &str) -> StoreResult<User> {
        let tables = self.lock()?;
        let user_id = *tables.api_tokens.get(token).ok_or(StoreError::NotFound)?;
        tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    // ── Lookup tables ────────────────────────────────────────────────────

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.lock()?.categories.clone())
    }

    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        Ok(self.lock()?.departments.clone())
    }

    async fn list_provinces(&self, department_id: Option<i64>) -> StoreResult<Vec<Province>> {
        let tables = self.lock()?;
        Ok(tables
            .provinces
            .iter()
            .filter(|p| department_id.map_or(true, |d| p.department_id == d))
            .cloned()
            .collect())
    }

    async fn list_districts(&self, province_id: Option<i64>) -> StoreResult<Vec<District>> {
        let tables = self.lock()?;
        Ok(tables
            .districts
            .iter()
            .filter(|d| province_id.map_or(true, |p| d.province_id == p))
            .cloned()
            .collect())
    }

    // ── Organizer profiles ───────────────────────────────────────────────

    async fn create_organizer(&self, new: &NewOrganizer) -> StoreResult<Organizer> {
        let mut tables = self.lock()?;
        if tables.organizers.iter().any(|o| o.user_id == new.user_id) {
            return Err(StoreError::UniqueViolation);
        }
        let organizer = Organizer {
            id: tables.next_id(),
            user_id: new.user_id,
            document_type: new.document_type.clone(),
            document_number: new.document_number.clone(),
            business_name: new.business_name.clone(),
            ruc: new.ruc.clone(),
            work_certificate_file: new.work_certificate_file.clone(),
            is_approved: false,
            approval_date: None,
            created_at: Utc::now(),
        };
        tables.organizers.push(organizer.clone());
        Ok(organizer)
    }

    async fn get_organizer(&self, id: i64) -> StoreResult<Organizer> {
        let tables = self.lock()?;
        tables
            .organizers
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_organizer_by_user(&self, user_id: i64) -> StoreResult<Organizer> {
        let tables = self.lock()?;
        tables
            .organizers
            .iter()
            .find(|o| o.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_organizers(&self, page: Page) -> StoreResult<Vec<Organizer>> {
        let tables = self.lock()?;
        Ok(paginate(tables.organizers.iter().cloned(), page))
    }

    async fn update_organizer(&self, id: i64, patch: &OrganizerPatch) -> StoreResult<Organizer> {
        let mut tables = self.lock()?;
        let organizer = tables
            .organizers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(organizer);
        Ok(organizer.clone())
    }

    // ── Verifier profiles ────────────────────────────────────────────────

    async fn create_verifier(&self, new: &NewVerifier) -> StoreResult<Verifier> {
        let mut tables = self.lock()?;
        if tables.verifiers.iter().any(|v| v.user_id == new.user_id) {
            return Err(StoreError::UniqueViolation);
        }
        let verifier = Verifier {
            id: tables.next_id(),
            user_id: new.user_id,
            organizer_id: new.organizer_id,
        };
        tables.verifiers.push(verifier.clone());
        Ok(verifier)
    }

    async fn get_verifier(&self, id: i64) -> StoreResult<Verifier> {
        let tables = self.lock()?;
        tables
            .verifiers
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_verifier_by_user(&self, user_id: i64) -> StoreResult<Verifier> {
        let tables = self.lock()?;
        tables
            .verifiers
            .iter()
            .find(|v| v.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_verifiers(&self, page: Page) -> StoreResult<Vec<Verifier>> {
        let tables = self.lock()?;
        Ok(paginate(tables.verifiers.iter().cloned(), page))
    }

    async fn update_verifier(&self, id: i64, patch: &VerifierPatch) -> StoreResult<Verifier> {
        let mut tables = self.lock()?;
        let verifier = tables
            .verifiers
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(verifier);
        Ok(verifier.clone())
    }

    // ── Events ───────────────────────────────────────────────────────────

    async fn create_event(&self, new: &NewEvent) -> StoreResult<Event> {
        let mut tables = self.lock()?;
        let event = Event {
            id: tables.next_id(),
            title: new.title.clone(),
            description: new.description.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            district_id: new.district_id,
            location_description: new.location_description.clone(),
            category_id: new.category_id,
            organizer_id: new.organizer_id,
            organizer_user_id: new.organizer_user_id,
            image_url: new.image_url.clone(),
            status: new.status.clone(),
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: i64) -> StoreResult<Event> {
        let tables = self.lock()?;
        tables
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_events(&self, filter: EventFilter, page: Page) -> StoreResult<Vec<Event>> {
        let tables = self.lock()?;
        let rows = tables
            .events
            .iter()
            .filter(|e| filter.category_id.map_or(true, |c| e.category_id == c))
            .filter(|e| filter.organizer_id.map_or(true, |o| e.organizer_id == o))
            .cloned();
        Ok(paginate(rows, page))
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<Event> {
        let mut tables = self.lock()?;
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(event);
        Ok(event.clone())
    }

    async fn delete_event(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        if tables.events.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Verifier assignments ─────────────────────────────────────────────

    async fn create_event_verifier(&self, new: &NewEventVerifier) -> StoreResult<EventVerifier> {
        let mut tables = self.lock()?;
        let assignment = EventVerifier {
            id: tables.next_id(),
            verifier_id: new.verifier_id,
            event_id: new.event_id,
        };
        tables.event_verifiers.push(assignment.clone());
        Ok(assignment)
    }

    async fn get_event_verifier(&self, id: i64) -> StoreResult<EventVerifier> {
        let tables = self.lock()?;
        tables
            .event_verifiers
            .iter()
            .find(|ev| ev.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_event_verifiers(
        &self,
        event_id: Option<i64>,
        verifier_id: Option<i64>,
    ) -> StoreResult<Vec<EventVerifier>> {
        let tables = self.lock()?;
        Ok(tables
            .event_verifiers
            .iter()
            .filter(|ev| event_id.map_or(true, |e| ev.event_id == e))
            .filter(|ev| verifier_id.map_or(true, |v| ev.verifier_id == v))
            .cloned()
            .collect())
    }

    async fn delete_event_verifier(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let before = tables.event_verifiers.len();
        tables.event_verifiers.retain(|ev| ev.id != id);
        if tables.event_verifiers.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Ticket types ─────────────────────────────────────────────────────

    async fn create_ticket_type(&self, new: &NewTicketType) -> StoreResult<TicketType> {
        let mut tables = self.lock()?;
        let ticket_type = TicketType {
            id: tables.next_id(),
            event_id: new.event_id,
            name: new.name.clone(),
            price: new.price,
            capacity: new.capacity,
        };
        tables.ticket_types.push(ticket_type.clone());
        Ok(ticket_type)
    }

    async fn get_ticket_type(&self, id: i64) -> StoreResult<TicketType> {
        let tables = self.lock()?;
        tables
            .ticket_types
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_ticket_types(&self, event_id: Option<i64>) -> StoreResult<Vec<TicketType>> {
        let tables = self.lock()?;
        Ok(tables
            .ticket_types
            .iter()
            .filter(|t| event_id.map_or(true, |e| t.event_id == e))
            .cloned()
            .collect())
    }

    async fn update_ticket_type(
        &self,
        id: i64,
        patch: &TicketTypePatch,
    ) -> StoreResult<TicketType> {
        let mut tables = self.lock()?;
        let ticket_type = tables
            .ticket_types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(ticket_type);
        Ok(ticket_type.clone())
    }

    async fn delete_ticket_type(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let before = tables.ticket_types.len();
        tables.ticket_types.retain(|t| t.id != id);
        if tables.ticket_types.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Purchases ────────────────────────────────────────────────────────

    async fn create_purchase(&self, new: &NewPurchase) -> StoreResult<Purchase> {
        let mut tables = self.lock()?;
        let purchase = Purchase {
            id: tables.next_id(),
            event_id: new.event_id,
            user_id: new.user_id,
            total_amount: new.total_amount,
            purchase_date: Utc::now(),
        };
        tables.purchases.push(purchase.clone());
        Ok(purchase)
    }

    async fn get_purchase(&self, id: i64) -> StoreResult<Purchase> {
        let tables = self.lock()?;
        tables
            .purchases
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_purchases(
        &self,
        filter: PurchaseFilter,
        page: Page,
    ) -> StoreResult<Vec<Purchase>> {
        let tables = self.lock()?;
        let rows = tables
            .purchases
            .iter()
            .filter(|p| filter.user_id.map_or(true, |u| p.user_id == u))
            .filter(|p| filter.event_id.map_or(true, |e| p.event_id == e))
            .cloned();
        Ok(paginate(rows, page))
    }

    // ── Purchase details ─────────────────────────────────────────────────

    async fn create_purchase_detail(
        &self,
        new: &NewPurchaseDetail,
    ) -> StoreResult<PurchaseDetail> {
        let mut tables = self.lock()?;
        let detail = PurchaseDetail {
            id: tables.next_id(),
            purchase_id: new.purchase_id,
            ticket_type_id: new.ticket_type_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            subtotal: new.subtotal,
        };
        tables.purchase_details.push(detail.clone());
        Ok(detail)
    }

    async fn list_purchase_details(&self, purchase_id: i64) -> StoreResult<Vec<PurchaseDetail>> {
        let tables = self.lock()?;
        Ok(tables
            .purchase_details
            .iter()
            .filter(|d| d.purchase_id == purchase_id)
            .cloned()
            .collect())
    }

    // ── Tickets ──────────────────────────────────────────────────────────

    async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket> {
        let mut tables = self.lock()?;
        // Check and insert under one lock: the memory-backend equivalent of
        // the unique index arbitrating concurrent inserts.
        if tables.tickets.iter().any(|t| t.code == code) {
            return Err(StoreError::UniqueViolation);
        }
        let ticket = Ticket {
            id: tables.next_id(),
            purchase_id,
            code: code.to_string(),
            status: TicketStatus::Active,
            created_at: Utc::now(),
            used_at: None,
            verifier_id: None,
        };
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, id: i64) -> StoreResult<Ticket> {
        let tables = self.lock()?;
        tables
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_ticket_by_code(&self, code: &str) -> StoreResult<Ticket> {
        let tables = self.lock()?;
        tables
            .tickets
            .iter()
            .find(|t| t.code == code)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_tickets(&self, filter: TicketFilter, page: Page) -> StoreResult<Vec<Ticket>> {
        let tables = self.lock()?;
        let owner_purchases: Vec<i64> = match filter.user_id {
            Some(user_id) => tables
                .purchases
                .iter()
                .filter(|p| p.user_id == user_id)
                .map(|p| p.id)
                .collect(),
            None => Vec::new(),
        };
        let rows = tables
            .tickets
            .iter()
            .filter(|t| filter.purchase_id.map_or(true, |p| t.purchase_id == p))
            .filter(|t| filter.user_id.is_none() || owner_purchases.contains(&t.purchase_id))
            .cloned();
        Ok(paginate(rows, page))
    }

    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> StoreResult<Ticket> {
        let mut tables = self.lock()?;
        let ticket = tables
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(ticket);
        Ok(ticket.clone())
    }

    // ── Reports ──────────────────────────────────────────────────────────

    async fn create_report(&self, new: &NewReport) -> StoreResult<Report> {
        let mut tables = self.lock()?;
        let report = Report {
            id: tables.next_id(),
            user_id: new.user_id,
            report_type: new.report_type.clone(),
            description: new.description.clone(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        tables.reports.push(report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: i64) -> StoreResult<Report> {
        let tables = self.lock()?;
        tables
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_reports(&self, user_id: Option<i64>, page: Page) -> StoreResult<Vec<Report>> {
        let tables = self.lock()?;
        let rows = tables
            .reports
            .iter()
            .filter(|r| user_id.map_or(true, |u| r.user_id == u))
            .cloned();
        Ok(paginate(rows, page))
    }

    async fn update_report(&self, id: i64, patch: &ReportPatch) -> StoreResult<Report> {
        let mut tables = self.lock()?;
        let report = tables
            .reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(report);
        Ok(report.clone())
    }

    // ── Contact messages ─────────────────────────────────────────────────

    async fn create_contact_message(
        &self,
        new: &NewContactMessage,
    ) -> StoreResult<ContactMessage> {
        let mut tables = self.lock()?;
        let contact = ContactMessage {
            id: tables.next_id(),
            first_names: new.first_names.clone(),
            last_names: new.last_names.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            subject: new.subject.clone(),
            message: new.message.clone(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        tables.contact_messages.push(contact.clone());
        Ok(contact)
    }

    async fn get_contact_message(&self, id: i64) -> StoreResult<ContactMessage> {
        let tables = self.lock()?;
        tables
            .contact_messages
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_contact_messages(&self, page: Page) -> StoreResult<Vec<ContactMessage>> {
        let tables = self.lock()?;
        Ok(paginate(tables.contact_messages.iter().cloned(), page))
    }

    async fn update_contact_message(
        &self,
        id: i64,
        patch: &ContactPatch,
    ) -> StoreResult<ContactMessage> {
        let mut tables = self.lock()?;
        let contact = tables
            .contact_messages
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(contact);
        Ok(contact.clone())
    }

    // ── Favorites ────────────────────────────────────────────────────────

    async fn create_favorite(&self, new: &NewFavorite) -> StoreResult<Favorite> {
        let mut tables = self.lock()?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == new.user_id && f.event_id == new.event_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let favorite = Favorite {
            id: tables.next_id(),
            user_id: new.user_id,
            event_id: new.event_id,
        };
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn get_favorite(&self, id: i64) -> StoreResult<Favorite> {
        let tables = self.lock()?;
        tables
            .favorites
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_favorite(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Favorite>> {
        let tables = self.lock()?;
        Ok(tables
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.event_id == event_id)
            .cloned())
    }

    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let tables = self.lock()?;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let before = tables.favorites.len();
        tables.favorites.retain(|f| f.id != id);
        if tables.favorites.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Ratings ──────────────────────────────────────────────────────────

    async fn create_rating(&self, new: &NewRating) -> StoreResult<Rating> {
        let mut tables = self.lock()?;
        if tables
            .ratings
            .iter()
            .any(|r| r.user_id == new.user_id && r.event_id == new.event_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let rating = Rating {
            id: tables.next_id(),
            user_id: new.user_id,
            event_id: new.event_id,
            score: new.score,
            comment: new.comment.clone(),
        };
        tables.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn find_rating(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Rating>> {
        let tables = self.lock()?;
        Ok(tables
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.event_id == event_id)
            .cloned())
    }

    async fn list_ratings(&self, filter: RatingFilter) -> StoreResult<Vec<Rating>> {
        let tables = self.lock()?;
        Ok(tables
            .ratings
            .iter()
            .filter(|r| filter.event_id.map_or(true, |e| r.event_id == e))
            .filter(|r| filter.user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect())
    }

    // ── Claims ───────────────────────────────────────────────────────────

    async fn create_claim(&self, new: &NewClaim) -> StoreResult<Claim> {
        let mut tables = self.lock()?;
        let claim = Claim {
            id: tables.next_id(),
            first_names: new.first_names.clone(),
            last_names: new.last_names.clone(),
            document_type: new.document_type.clone(),
            document_number: new.document_number.clone(),
            address: new.address.clone(),
            district_id: new.district_id,
            home_phone: new.home_phone.clone(),
            mobile_phone: new.mobile_phone.clone(),
            email: new.email.clone(),
            is_minor: new.is_minor,
            claim_amount: new.claim_amount,
            service_type: new.service_type.clone(),
            product_service_description: new.product_service_description.clone(),
            claim_type: new.claim_type.clone(),
            claim_detail: new.claim_detail.clone(),
            customer_request: new.customer_request.clone(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        tables.claims.push(claim.clone());
        Ok(claim)
    }

    async fn get_claim(&self, id: i64) -> StoreResult<Claim> {
        let tables = self.lock()?;
        tables
            .claims
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_claims(&self, page: Page) -> StoreResult<Vec<Claim>> {
        let tables = self.lock()?;
        Ok(paginate(tables.claims.iter().cloned(), page))
    }

    async fn update_claim(&self, id: i64, patch: &ClaimPatch) -> StoreResult<Claim> {
        let mut tables = self.lock()?;
        let claim = tables
            .claims
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(claim);
        Ok(claim.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            first_names: "Test".to_string(),
            last_names: "User".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            phone: None,
            gender: None,
            avatar_url: None,
            role,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        store
            .create_user(&new_user("a@example.com", Role::Buyer), "h")
            .await
            .unwrap();
        let err = store
            .create_user(&new_user("a@example.com", Role::Buyer), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn one_organizer_profile_per_user() {
        let store = MemoryStore::new();
        let new = NewOrganizer {
            user_id: 1,
            document_type: "DNI".to_string(),
            document_number: "12345678".to_string(),
            business_name: None,
            ruc: None,
            work_certificate_file: None,
        };
        store.create_organizer(&new).await.unwrap();
        let err = store.create_organizer(&new).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn duplicate_favorite_pair_rejected_either_order() {
        let store = MemoryStore::new();
        let pair = NewFavorite {
            user_id: 3,
            event_id: 9,
        };
        store.create_favorite(&pair).await.unwrap();
        let err = store.create_favorite(&pair).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        // A different pair sharing one side is fine.
        store
            .create_favorite(&NewFavorite {
                user_id: 3,
                event_id: 10,
            })
            .await
            .unwrap();
        store
            .create_favorite(&NewFavorite {
                user_id: 4,
                event_id: 9,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ticket_code_collision_reported_distinguishably() {
        let store = MemoryStore::new();
        store.insert_ticket(1, "111111111111").await.unwrap();
        let err = store.insert_ticket(2, "111111111111").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn ticket_update_touches_only_validation_state() {
        let store = MemoryStore::new();
        let ticket = store.insert_ticket(7, "222222222222").await.unwrap();

        let patch = TicketPatch {
            status: Some(TicketStatus::Used),
            used_at: Some(Utc::now()),
            verifier_id: Some(42),
        };
        let updated = store.update_ticket(ticket.id, &patch).await.unwrap();

        assert_eq!(updated.status, TicketStatus::Used);
        assert_eq!(updated.verifier_id, Some(42));
        assert!(updated.used_at.is_some());
        // Immutable parts survived.
        assert_eq!(updated.code, ticket.code);
        assert_eq!(updated.purchase_id, ticket.purchase_id);
    }

    #[tokio::test]
    async fn tickets_list_resolves_ownership_through_purchases() {
        let store = MemoryStore::new();
        let mine = store
            .create_purchase(&NewPurchase {
                event_id: 1,
                user_id: 10,
                total_amount: rust_decimal::Decimal::new(5000, 2),
            })
            .await
            .unwrap();
        let theirs = store
            .create_purchase(&NewPurchase {
                event_id: 1,
                user_id: 11,
                total_amount: rust_decimal::Decimal::new(5000, 2),
            })
            .await
            .unwrap();
        store.insert_ticket(mine.id, "333333333333").await.unwrap();
        store.insert_ticket(theirs.id, "444444444444").await.unwrap();

        let filter = TicketFilter {
            purchase_id: None,
            user_id: Some(10),
        };
        let rows = store.list_tickets(filter, Page::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].purchase_id, mine.id);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_event(999).await.unwrap_err(),
            StoreError::NotFound
        ));
        assert!(matches!(
            store.delete_event(999).await.unwrap_err(),
            StoreError::NotFound
        ));
    }
}
