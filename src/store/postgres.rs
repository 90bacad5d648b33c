//! PostgreSQL backend. Runtime-checked queries against the schema in
//! `migrations/`; uniqueness constraints in the schema are the authoritative
//! arbiter for every write that can collide.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    Category, Claim, ClaimPatch, ContactMessage, ContactPatch, Department, District, Event,
    EventFilter, EventPatch, EventVerifier, Favorite, NewClaim, NewContactMessage, NewEvent,
    NewEventVerifier, NewFavorite, NewOrganizer, NewPurchase, NewPurchaseDetail, NewRating,
    NewReport, NewTicketType, NewUser, NewVerifier, Organizer, OrganizerPatch, Province, Purchase,
    PurchaseDetail, PurchaseFilter, Rating, RatingFilter, Report, ReportPatch, Ticket,
    TicketFilter, TicketPatch, TicketType, TicketTypePatch, User, UserPatch, Verifier,
    VerifierPatch,
};
use crate::store::{Page, Store, StoreError, StoreResult};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::UniqueViolation
        }
        _ => StoreError::Backend(e.to_string()),
    }
}

const USER_COLUMNS: &str =
    "id, first_names, last_names, email, password_hash, phone, gender, avatar_url, role, created_at";
const ORGANIZER_COLUMNS: &str = "id, user_id, document_type, document_number, business_name, ruc, \
     work_certificate_file, is_approved, approval_date, created_at";
const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, district_id, \
     location_description, category_id, organizer_id, organizer_user_id, image_url, status";
const TICKET_COLUMNS: &str = "id, purchase_id, code, status, created_at, used_at, verifier_id";
const CLAIM_COLUMNS: &str = "id, first_names, last_names, document_type, document_number, \
     address, district_id, home_phone, mobile_phone, email, is_minor, claim_amount, service_type, \
     product_service_description, claim_type, claim_detail, customer_request, status, created_at";

#[async_trait]
impl Store for PgStore {
    // ── Users ────────────────────────────────────────────────────────────

    async fn create_user(&self, new: &NewUser, password_hash: &str) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (first_names, last_names, email, password_hash, phone, gender, avatar_url, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&new.first_names)
            .bind(&new.last_names)
            .bind(&new.email)
            .bind(password_hash)
            .bind(&new.phone)
            .bind(&new.gender)
            .bind(&new.avatar_url)
            .bind(new.role)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, User>(&sql)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<User> {
        let mut user = self.get_user(id).await?;
        patch.apply(&mut user);
        let sql = format!(
            "UPDATE users SET first_names = $2, last_names = $3, phone = $4, gender = $5, \
             avatar_url = $6 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&user.first_names)
            .bind(&user.last_names)
            .bind(&user.phone)
            .bind(&user.gender)
            .bind(&user.avatar_url)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn create_api_token(&self, user_id: i64, token: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO api_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn get_user_by_token(&self, token: &str) -> StoreResult<User> {
        let sql = "SELECT u.id, u.first_names, u.last_names, u.email, u.password_hash, u.phone, \
             u.gender, u.avatar_url, u.role, u.created_at \
             FROM users u JOIN api_tokens t ON t.user_id = u.id WHERE t.token = $1";
        sqlx::query_as::<_, User>(sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    // ── Lookup tables ────────────────────────────────────────────────────

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_provinces(&self, department_id: Option<i64>) -> StoreResult<Vec<Province>> {
        sqlx::query_as::<_, Province>(
            "SELECT id, department_id, name FROM provinces \
             WHERE ($1::bigint IS NULL OR department_id = $1) ORDER BY id",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_districts(&self, province_id: Option<i64>) -> StoreResult<Vec<District>> {
        sqlx::query_as::<_, District>(
            "SELECT id, province_id, name FROM districts \
             WHERE ($1::bigint IS NULL OR province_id = $1) ORDER BY id",
        )
        .bind(province_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Organizer profiles ───────────────────────────────────────────────

    async fn create_organizer(&self, new: &NewOrganizer) -> StoreResult<Organizer> {
        let sql = format!(
            "INSERT INTO organizers (user_id, document_type, document_number, business_name, ruc, \
             work_certificate_file) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORGANIZER_COLUMNS}"
        );
        sqlx::query_as::<_, Organizer>(&sql)
            .bind(new.user_id)
            .bind(&new.document_type)
            .bind(&new.document_number)
            .bind(&new.business_name)
            .bind(&new.ruc)
            .bind(&new.work_certificate_file)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_organizer(&self, id: i64) -> StoreResult<Organizer> {
        let sql = format!("SELECT {ORGANIZER_COLUMNS} FROM organizers WHERE id = $1");
        sqlx::query_as::<_, Organizer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn get_organizer_by_user(&self, user_id: i64) -> StoreResult<Organizer> {
        let sql = format!("SELECT {ORGANIZER_COLUMNS} FROM organizers WHERE user_id = $1");
        sqlx::query_as::<_, Organizer>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn list_organizers(&self, page: Page) -> StoreResult<Vec<Organizer>> {
        let sql =
            format!("SELECT {ORGANIZER_COLUMNS} FROM organizers ORDER BY id OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, Organizer>(&sql)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_organizer(&self, id: i64, patch: &OrganizerPatch) -> StoreResult<Organizer> {
        let mut organizer = self.get_organizer(id).await?;
        patch.apply(&mut organizer);
        let sql = format!(
            "UPDATE organizers SET document_type = $2, document_number = $3, business_name = $4, \
             ruc = $5, work_certificate_file = $6, is_approved = $7, approval_date = $8 \
             WHERE id = $1 RETURNING {ORGANIZER_COLUMNS}"
        );
        sqlx::query_as::<_, Organizer>(&sql)
            .bind(id)
            .bind(&organizer.document_type)
            .bind(&organizer.document_number)
            .bind(&organizer.business_name)
            .bind(&organizer.ruc)
            .bind(&organizer.work_certificate_file)
            .bind(organizer.is_approved)
            .bind(organizer.approval_date)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    // ── Verifier profiles ────────────────────────────────────────────────

    async fn create_verifier(&self, new: &NewVerifier) -> StoreResult<Verifier> {
        sqlx::query_as::<_, Verifier>(
            "INSERT INTO verifiers (user_id, organizer_id) VALUES ($1, $2) \
             RETURNING id, user_id, organizer_id",
        )
        .bind(new.user_id)
        .bind(new.organizer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_verifier(&self, id: i64) -> StoreResult<Verifier> {
        sqlx::query_as::<_, Verifier>("SELECT id, user_id, organizer_id FROM verifiers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn get_verifier_by_user(&self, user_id: i64) -> StoreResult<Verifier> {
        sqlx::query_as::<_, Verifier>(
            "SELECT id, user_id, organizer_id FROM verifiers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_verifiers(&self, page: Page) -> StoreResult<Vec<Verifier>> {
        sqlx::query_as::<_, Verifier>(
            "SELECT id, user_id, organizer_id FROM verifiers ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_verifier(&self, id: i64, patch: &VerifierPatch) -> StoreResult<Verifier> {
        let mut verifier = self.get_verifier(id).await?;
        patch.apply(&mut verifier);
        sqlx::query_as::<_, Verifier>(
            "UPDATE verifiers SET organizer_id = $2 WHERE id = $1 \
             RETURNING id, user_id, organizer_id",
        )
        .bind(id)
        .bind(verifier.organizer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Events ───────────────────────────────────────────────────────────

    async fn create_event(&self, new: &NewEvent) -> StoreResult<Event> {
        let sql = format!(
            "INSERT INTO events (title, description, start_date, end_date, district_id, \
             location_description, category_id, organizer_id, organizer_user_id, image_url, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(new.district_id)
            .bind(&new.location_description)
            .bind(new.category_id)
            .bind(new.organizer_id)
            .bind(new.organizer_user_id)
            .bind(&new.image_url)
            .bind(&new.status)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_event(&self, id: i64) -> StoreResult<Event> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn list_events(&self, filter: EventFilter, page: Page) -> StoreResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::bigint IS NULL OR category_id = $1) \
             AND ($2::bigint IS NULL OR organizer_id = $2) \
             ORDER BY id OFFSET $3 LIMIT $4"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(filter.category_id)
            .bind(filter.organizer_id)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<Event> {
        let mut event = self.get_event(id).await?;
        patch.apply(&mut event);
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, start_date = $4, end_date = $5, \
             district_id = $6, location_description = $7, category_id = $8, image_url = $9, \
             status = $10 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.district_id)
            .bind(&event.location_description)
            .bind(event.category_id)
            .bind(&event.image_url)
            .bind(&event.status)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn delete_event(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Verifier assignments ─────────────────────────────────────────────

    async fn create_event_verifier(&self, new: &NewEventVerifier) -> StoreResult<EventVerifier> {
        sqlx::query_as::<_, EventVerifier>(
            "INSERT INTO event_verifiers (verifier_id, event_id) VALUES ($1, $2) \
             RETURNING id, verifier_id, event_id",
        )
        .bind(new.verifier_id)
        .bind(new.event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_event_verifier(&self, id: i64) -> StoreResult<EventVerifier> {
        sqlx::query_as::<_, EventVerifier>(
            "SELECT id, verifier_id, event_id FROM event_verifiers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_event_verifiers(
        &self,
        event_id: Option<i64>,
        verifier_id: Option<i64>,
    ) -> StoreResult<Vec<EventVerifier>> {
        sqlx::query_as::<_, EventVerifier>(
            "SELECT id, verifier_id, event_id FROM event_verifiers \
             WHERE ($1::bigint IS NULL OR event_id = $1) \
             AND ($2::bigint IS NULL OR verifier_id = $2) ORDER BY id",
        )
        .bind(event_id)
        .bind(verifier_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn delete_event_verifier(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM event_verifiers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Ticket types ─────────────────────────────────────────────────────

    async fn create_ticket_type(&self, new: &NewTicketType) -> StoreResult<TicketType> {
        sqlx::query_as::<_, TicketType>(
            "INSERT INTO ticket_types (event_id, name, price, capacity) VALUES ($1, $2, $3, $4) \
             RETURNING id, event_id, name, price, capacity",
        )
        .bind(new.event_id)
        .bind(&new.name)
        .bind(new.price)
        .bind(new.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_ticket_type(&self, id: i64) -> StoreResult<TicketType> {
        sqlx::query_as::<_, TicketType>(
            "SELECT id, event_id, name, price, capacity FROM ticket_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_ticket_types(&self, event_id: Option<i64>) -> StoreResult<Vec<TicketType>> {
        sqlx::query_as::<_, TicketType>(
            "SELECT id, event_id, name, price, capacity FROM ticket_types \
             WHERE ($1::bigint IS NULL OR event_id = $1) ORDER BY id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_ticket_type(
        &self,
        id: i64,
        patch: &TicketTypePatch,
    ) -> StoreResult<TicketType> {
        let mut ticket_type = self.get_ticket_type(id).await?;
        patch.apply(&mut ticket_type);
        sqlx::query_as::<_, TicketType>(
            "UPDATE ticket_types SET name = $2, price = $3, capacity = $4 WHERE id = $1 \
             RETURNING id, event_id, name, price, capacity",
        )
        .bind(id)
        .bind(&ticket_type.name)
        .bind(ticket_type.price)
        .bind(ticket_type.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn delete_ticket_type(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Purchases ────────────────────────────────────────────────────────

    async fn create_purchase(&self, new: &NewPurchase) -> StoreResult<Purchase> {
        sqlx::query_as::<_, Purchase>(
            "INSERT INTO purchases (event_id, user_id, total_amount) VALUES ($1, $2, $3) \
             RETURNING id, event_id, user_id, total_amount, purchase_date",
        )
        .bind(new.event_id)
        .bind(new.user_id)
        .bind(new.total_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_purchase(&self, id: i64) -> StoreResult<Purchase> {
        sqlx::query_as::<_, Purchase>(
            "SELECT id, event_id, user_id, total_amount, purchase_date FROM purchases WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_purchases(
        &self,
        filter: PurchaseFilter,
        page: Page,
    ) -> StoreResult<Vec<Purchase>> {
        sqlx::query_as::<_, Purchase>(
            "SELECT id, event_id, user_id, total_amount, purchase_date FROM purchases \
             WHERE ($1::bigint IS NULL OR user_id = $1) \
             AND ($2::bigint IS NULL OR event_id = $2) \
             ORDER BY id OFFSET $3 LIMIT $4",
        )
        .bind(filter.user_id)
        .bind(filter.event_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Purchase details ─────────────────────────────────────────────────

    async fn create_purchase_detail(
        &self,
        new: &NewPurchaseDetail,
    ) -> StoreResult<PurchaseDetail> {
        sqlx::query_as::<_, PurchaseDetail>(
            "INSERT INTO purchase_details (purchase_id, ticket_type_id, quantity, unit_price, subtotal) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, purchase_id, ticket_type_id, quantity, unit_price, subtotal",
        )
        .bind(new.purchase_id)
        .bind(new.ticket_type_id)
        .bind(new.quantity)
        .bind(new.unit_price)
        .bind(new.subtotal)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_purchase_details(&self, purchase_id: i64) -> StoreResult<Vec<PurchaseDetail>> {
        sqlx::query_as::<_, PurchaseDetail>(
            "SELECT id, purchase_id, ticket_type_id, quantity, unit_price, subtotal \
             FROM purchase_details WHERE purchase_id = $1 ORDER BY id",
        )
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Tickets ──────────────────────────────────────────────────────────

    async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket> {
        // Single atomic insert; the unique index on `code` arbitrates
        // concurrent collisions.
        let sql = format!(
            "INSERT INTO tickets (purchase_id, code, status) VALUES ($1, $2, 'active') \
             RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(purchase_id)
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_ticket(&self, id: i64) -> StoreResult<Ticket> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn get_ticket_by_code(&self, code: &str) -> StoreResult<Ticket> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE code = $1");
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn list_tickets(&self, filter: TicketFilter, page: Page) -> StoreResult<Vec<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT t.id, t.purchase_id, t.code, t.status, t.created_at, t.used_at, t.verifier_id \
             FROM tickets t JOIN purchases p ON p.id = t.purchase_id \
             WHERE ($1::bigint IS NULL OR t.purchase_id = $1) \
             AND ($2::bigint IS NULL OR p.user_id = $2) \
             ORDER BY t.id OFFSET $3 LIMIT $4",
        )
        .bind(filter.purchase_id)
        .bind(filter.user_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> StoreResult<Ticket> {
        let mut ticket = self.get_ticket(id).await?;
        patch.apply(&mut ticket);
        let sql = format!(
            "UPDATE tickets SET status = $2, used_at = $3, verifier_id = $4 WHERE id = $1 \
             RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(id)
            .bind(ticket.status)
            .bind(ticket.used_at)
            .bind(ticket.verifier_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    // ── Reports ──────────────────────────────────────────────────────────

    async fn create_report(&self, new: &NewReport) -> StoreResult<Report> {
        sqlx::query_as::<_, Report>(
            "INSERT INTO reports (user_id, report_type, description) VALUES ($1, $2, $3) \
             RETURNING id, user_id, report_type, description, status, created_at",
        )
        .bind(new.user_id)
        .bind(&new.report_type)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_report(&self, id: i64) -> StoreResult<Report> {
        sqlx::query_as::<_, Report>(
            "SELECT id, user_id, report_type, description, status, created_at \
             FROM reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_reports(&self, user_id: Option<i64>, page: Page) -> StoreResult<Vec<Report>> {
        sqlx::query_as::<_, Report>(
            "SELECT id, user_id, report_type, description, status, created_at FROM reports \
             WHERE ($1::bigint IS NULL OR user_id = $1) ORDER BY id OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_report(&self, id: i64, patch: &ReportPatch) -> StoreResult<Report> {
        let mut report = self.get_report(id).await?;
        patch.apply(&mut report);
        sqlx::query_as::<_, Report>(
            "UPDATE reports SET status = $2 WHERE id = $1 \
             RETURNING id, user_id, report_type, description, status, created_at",
        )
        .bind(id)
        .bind(&report.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Contact messages ─────────────────────────────────────────────────

    async fn create_contact_message(
        &self,
        new: &NewContactMessage,
    ) -> StoreResult<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (first_names, last_names, email, phone, subject, message) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, first_names, last_names, email, phone, subject, message, status, created_at",
        )
        .bind(&new.first_names)
        .bind(&new.last_names)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.subject)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_contact_message(&self, id: i64) -> StoreResult<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(
            "SELECT id, first_names, last_names, email, phone, subject, message, status, created_at \
             FROM contact_messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn list_contact_messages(&self, page: Page) -> StoreResult<Vec<ContactMessage>> {
        sqlx::query_as::<_, ContactMessage>(
            "SELECT id, first_names, last_names, email, phone, subject, message, status, created_at \
             FROM contact_messages ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_contact_message(
        &self,
        id: i64,
        patch: &ContactPatch,
    ) -> StoreResult<ContactMessage> {
        let mut contact = self.get_contact_message(id).await?;
        patch.apply(&mut contact);
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET status = $2 WHERE id = $1 \
             RETURNING id, first_names, last_names, email, phone, subject, message, status, created_at",
        )
        .bind(id)
        .bind(&contact.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Favorites ────────────────────────────────────────────────────────

    async fn create_favorite(&self, new: &NewFavorite) -> StoreResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, event_id) VALUES ($1, $2) \
             RETURNING id, user_id, event_id",
        )
        .bind(new.user_id)
        .bind(new.event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn get_favorite(&self, id: i64) -> StoreResult<Favorite> {
        sqlx::query_as::<_, Favorite>("SELECT id, user_id, event_id FROM favorites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn find_favorite(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT id, user_id, event_id FROM favorites WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT id, user_id, event_id FROM favorites WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Ratings ──────────────────────────────────────────────────────────

    async fn create_rating(&self, new: &NewRating) -> StoreResult<Rating> {
        sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (user_id, event_id, score, comment) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, event_id, score, comment",
        )
        .bind(new.user_id)
        .bind(new.event_id)
        .bind(new.score)
        .bind(&new.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn find_rating(&self, user_id: i64, event_id: i64) -> StoreResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>(
            "SELECT id, user_id, event_id, score, comment FROM ratings \
             WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_ratings(&self, filter: RatingFilter) -> StoreResult<Vec<Rating>> {
        sqlx::query_as::<_, Rating>(
            "SELECT id, user_id, event_id, score, comment FROM ratings \
             WHERE ($1::bigint IS NULL OR event_id = $1) \
             AND ($2::bigint IS NULL OR user_id = $2) ORDER BY id",
        )
        .bind(filter.event_id)
        .bind(filter.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    // ── Claims ───────────────────────────────────────────────────────────

    async fn create_claim(&self, new: &NewClaim) -> StoreResult<Claim> {
        let sql = format!(
            "INSERT INTO claims (first_names, last_names, document_type, document_number, address, \
             district_id, home_phone, mobile_phone, email, is_minor, claim_amount, service_type, \
             product_service_description, claim_type, claim_detail, customer_request) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {CLAIM_COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&sql)
            .bind(&new.first_names)
            .bind(&new.last_names)
            .bind(&new.document_type)
            .bind(&new.document_number)
            .bind(&new.address)
            .bind(new.district_id)
            .bind(&new.home_phone)
            .bind(&new.mobile_phone)
            .bind(&new.email)
            .bind(new.is_minor)
            .bind(new.claim_amount)
            .bind(&new.service_type)
            .bind(&new.product_service_description)
            .bind(&new.claim_type)
            .bind(&new.claim_detail)
            .bind(&new.customer_request)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_claim(&self, id: i64) -> StoreResult<Claim> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1");
        sqlx::query_as::<_, Claim>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?
            .ok_or(StoreError::NotFound)
    }

    async fn list_claims(&self, page: Page) -> StoreResult<Vec<Claim>> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims ORDER BY id OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, Claim>(&sql)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_claim(&self, id: i64, patch: &ClaimPatch) -> StoreResult<Claim> {
        let mut claim = self.get_claim(id).await?;
        patch.apply(&mut claim);
        let sql =
            format!("UPDATE claims SET status = $2 WHERE id = $1 RETURNING {CLAIM_COLUMNS}");
        sqlx::query_as::<_, Claim>(&sql)
            .bind(id)
            .bind(&claim.status)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }
}
