use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{
    claims, contact, event_verifiers, events, favorites, health_check, locations, lookups,
    organizers, purchase_details, purchases, ratings, reports, ticket_types, tickets, users,
    verifiers,
};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        // Users
        .route("/users", post(users::register_user).get(users::read_users))
        .route("/users/me", get(users::read_me))
        .route(
            "/users/:user_id",
            get(users::read_user).patch(users::update_user),
        )
        // Public lookups
        .route("/locations/departments", get(locations::read_departments))
        .route("/locations/provinces", get(locations::read_provinces))
        .route("/locations/districts", get(locations::read_districts))
        .route("/categories", get(lookups::read_categories))
        .route("/roles", get(lookups::read_roles))
        // Organizer profiles
        .route(
            "/organizers",
            get(organizers::read_organizers).post(organizers::create_organizer),
        )
        .route(
            "/organizers/:organizer_id",
            get(organizers::read_organizer).patch(organizers::update_organizer),
        )
        // Verifier profiles
        .route(
            "/verifiers",
            get(verifiers::read_verifiers).post(verifiers::create_verifier),
        )
        .route(
            "/verifiers/:verifier_id",
            get(verifiers::read_verifier).patch(verifiers::update_verifier),
        )
        // Events
        .route("/events", get(events::read_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::read_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        // Verifier assignments
        .route(
            "/event-verifiers",
            get(event_verifiers::read_event_verifiers)
                .post(event_verifiers::create_event_verifier),
        )
        .route(
            "/event-verifiers/:event_verifier_id",
            delete(event_verifiers::delete_event_verifier),
        )
        // Ticket types
        .route(
            "/ticket-types",
            get(ticket_types::read_ticket_types).post(ticket_types::create_ticket_type),
        )
        .route(
            "/ticket-types/:ticket_type_id",
            get(ticket_types::read_ticket_type)
                .patch(ticket_types::update_ticket_type)
                .delete(ticket_types::delete_ticket_type),
        )
        // Purchases
        .route(
            "/purchases",
            get(purchases::read_purchases).post(purchases::create_purchase),
        )
        .route("/purchases/:purchase_id", get(purchases::read_purchase))
        .route(
            "/purchase-details",
            get(purchase_details::read_purchase_details)
                .post(purchase_details::create_purchase_detail),
        )
        // Tickets
        .route(
            "/tickets",
            get(tickets::read_tickets).post(tickets::create_ticket),
        )
        .route("/tickets/code/:code", get(tickets::read_ticket_by_code))
        .route(
            "/tickets/:ticket_id",
            get(tickets::read_ticket).patch(tickets::update_ticket),
        )
        // Reports
        .route(
            "/reports",
            get(reports::read_reports).post(reports::create_report),
        )
        .route(
            "/reports/:report_id",
            get(reports::read_report).patch(reports::update_report),
        )
        // Contact messages
        .route(
            "/contact",
            get(contact::read_contact_messages).post(contact::create_contact_message),
        )
        .route(
            "/contact/:contact_id",
            get(contact::read_contact_message).patch(contact::update_contact_message),
        )
        // Favorites
        .route(
            "/favorites",
            get(favorites::read_favorites).post(favorites::create_favorite),
        )
        .route(
            "/favorites/:favorite_id",
            delete(favorites::delete_favorite),
        )
        // Ratings
        .route(
            "/ratings",
            get(ratings::read_ratings).post(ratings::create_rating),
        )
        // Claims
        .route("/claims", get(claims::read_claims).post(claims::create_claim))
        .route(
            "/claims/:claim_id",
            get(claims::read_claim).patch(claims::update_claim),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer());

    apply_security_headers(router).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StoreAuthenticator;
    use crate::models::{NewEvent, NewPurchase, NewUser, Role};
    use crate::store::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

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

    fn new_event(organizer_id: i64, organizer_user_id: i64) -> NewEvent {
        NewEvent {
            title: "Feria del Libro".to_string(),
            description: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            district_id: 1,
            location_description: None,
            category_id: 1,
            organizer_id,
            organizer_user_id,
            image_url: None,
            status: "active".to_string(),
        }
    }

    struct Fixture {
        app: Router,
        store: Arc<MemoryStore>,
        admin_id: i64,
        buyer_id: i64,
        organizer_user_id: i64,
        event_id: i64,
    }

    /// Admin, buyer, organizer (with profile + event) and verifier users,
    /// each with a bearer token named after their role.
    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());

        let admin = store
            .create_user(&new_user("admin@example.com", Role::Administrator), "h")
            .await
            .unwrap();
        let buyer = store
            .create_user(&new_user("buyer@example.com", Role::Buyer), "h")
            .await
            .unwrap();
        let organizer_user = store
            .create_user(&new_user("organizer@example.com", Role::Organizer), "h")
            .await
            .unwrap();
        let verifier_user = store
            .create_user(&new_user("verifier@example.com", Role::Verifier), "h")
            .await
            .unwrap();

        for (user, token) in [
            (&admin, "admin-token"),
            (&buyer, "buyer-token"),
            (&organizer_user, "organizer-token"),
            (&verifier_user, "verifier-token"),
        ] {
            store.create_api_token(user.id, token).await.unwrap();
        }

        let organizer = store
            .create_organizer(&crate::models::NewOrganizer {
                user_id: organizer_user.id,
                document_type: "DNI".to_string(),
                document_number: "12345678".to_string(),
                business_name: None,
                ruc: None,
                work_certificate_file: None,
            })
            .await
            .unwrap();

        let event = store
            .create_event(&new_event(organizer.id, organizer_user.id))
            .await
            .unwrap();

        let state = AppState::new(
            store.clone() as Arc<dyn Store>,
            Arc::new(StoreAuthenticator::new(store.clone() as Arc<dyn Store>)),
        );

        Fixture {
            app: create_routes(state),
            store,
            admin_id: admin.id,
            buyer_id: buyer.id,
            organizer_user_id: organizer_user.id,
            event_id: event.id,
        }
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_is_public() {
        let fx = fixture().await;
        let response = fx
            .app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_endpoints_require_a_bearer_token() {
        let fx = fixture().await;
        let response = fx
            .app
            .oneshot(request("GET", "/purchases", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn absent_event_is_not_found_before_permission_is_considered() {
        let fx = fixture().await;
        // The buyer would be forbidden if the event existed; absence wins.
        let response = fx
            .app
            .oneshot(request(
                "PATCH",
                "/events/9999",
                Some("buyer-token"),
                Some(r#"{"title":"hijacked"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn event_update_is_forbidden_for_non_owners_and_allowed_for_owner() {
        let fx = fixture().await;
        let uri = format!("/events/{}", fx.event_id);

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "PATCH",
                &uri,
                Some("buyer-token"),
                Some(r#"{"title":"hijacked"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fx
            .app
            .oneshot(request(
                "PATCH",
                &uri,
                Some("organizer-token"),
                Some(r#"{"title":"renamed"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn user_list_is_admin_only() {
        let fx = fixture().await;

        let response = fx
            .app
            .clone()
            .oneshot(request("GET", "/users", Some("buyer-token"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fx
            .app
            .oneshot(request("GET", "/users", Some("admin-token"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_favorite_is_a_conflict() {
        let fx = fixture().await;
        let body = format!(
            r#"{{"user_id":{},"event_id":{}}}"#,
            fx.buyer_id, fx.event_id
        );

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "POST",
                "/favorites",
                Some("buyer-token"),
                Some(&body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = fx
            .app
            .oneshot(request(
                "POST",
                "/favorites",
                Some("buyer-token"),
                Some(&body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn buyers_cannot_favorite_on_behalf_of_others() {
        let fx = fixture().await;
        let body = format!(
            r#"{{"user_id":{},"event_id":{}}}"#,
            fx.admin_id, fx.event_id
        );
        let response = fx
            .app
            .oneshot(request(
                "POST",
                "/favorites",
                Some("buyer-token"),
                Some(&body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn issued_ticket_codes_are_twelve_digits() {
        let fx = fixture().await;
        let purchase = fx
            .store
            .create_purchase(&NewPurchase {
                event_id: fx.event_id,
                user_id: fx.buyer_id,
                total_amount: Decimal::new(12000, 2),
            })
            .await
            .unwrap();

        let response = fx
            .app
            .oneshot(request(
                "POST",
                &format!("/tickets?purchase_id={}", purchase.id),
                Some("buyer-token"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        let code = json["data"]["code"].as_str().unwrap();
        assert_eq!(code.len(), 12);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
    }

    #[tokio::test]
    async fn ticket_validation_is_reserved_for_gate_staff() {
        let fx = fixture().await;
        let purchase = fx
            .store
            .create_purchase(&NewPurchase {
                event_id: fx.event_id,
                user_id: fx.buyer_id,
                total_amount: Decimal::new(12000, 2),
            })
            .await
            .unwrap();
        let ticket = fx.store.insert_ticket(purchase.id, "123456789012").await.unwrap();
        let uri = format!("/tickets/{}", ticket.id);

        // The owning buyer can read but not validate.
        let response = fx
            .app
            .clone()
            .oneshot(request("GET", &uri, Some("buyer-token"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "PATCH",
                &uri,
                Some("buyer-token"),
                Some(r#"{"status":"used"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "PATCH",
                &uri,
                Some("verifier-token"),
                Some(r#"{"status":"used"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // And a used ticket cannot go back to active.
        let response = fx
            .app
            .oneshot(request(
                "PATCH",
                &uri,
                Some("verifier-token"),
                Some(r#"{"status":"active"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn code_lookup_is_for_gate_staff_only() {
        let fx = fixture().await;
        let purchase = fx
            .store
            .create_purchase(&NewPurchase {
                event_id: fx.event_id,
                user_id: fx.buyer_id,
                total_amount: Decimal::new(12000, 2),
            })
            .await
            .unwrap();
        fx.store.insert_ticket(purchase.id, "555566667777").await.unwrap();

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "GET",
                "/tickets/code/555566667777",
                Some("buyer-token"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fx
            .app
            .oneshot(request(
                "GET",
                "/tickets/code/555566667777",
                Some("verifier-token"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ticket_lists_narrow_to_the_requesting_buyer() {
        let fx = fixture().await;
        let mine = fx
            .store
            .create_purchase(&NewPurchase {
                event_id: fx.event_id,
                user_id: fx.buyer_id,
                total_amount: Decimal::new(1000, 2),
            })
            .await
            .unwrap();
        let theirs = fx
            .store
            .create_purchase(&NewPurchase {
                event_id: fx.event_id,
                user_id: fx.organizer_user_id,
                total_amount: Decimal::new(1000, 2),
            })
            .await
            .unwrap();
        fx.store.insert_ticket(mine.id, "000011112222").await.unwrap();
        fx.store.insert_ticket(theirs.id, "000011113333").await.unwrap();

        // Asking for someone else's tickets returns your own instead.
        let response = fx
            .app
            .oneshot(request(
                "GET",
                &format!("/tickets?user_id={}", fx.organizer_user_id),
                Some("buyer-token"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["purchase_id"].as_i64().unwrap(), mine.id);
    }

    #[tokio::test]
    async fn claims_can_be_filed_anonymously_but_read_by_admins_only() {
        let fx = fixture().await;
        let body = r#"{
            "first_names": "Maria",
            "last_names": "Quispe",
            "document_type": "DNI",
            "document_number": "87654321",
            "address": "Av. Los Alamos 123",
            "district_id": 1,
            "mobile_phone": "999888777",
            "email": "maria@example.com",
            "service_type": "ticketing",
            "product_service_description": "entrada no valida",
            "claim_type": "reclamo",
            "claim_detail": "la entrada fue rechazada",
            "customer_request": "reembolso"
        }"#;

        let response = fx
            .app
            .clone()
            .oneshot(request("POST", "/claims", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = fx
            .app
            .clone()
            .oneshot(request("GET", "/claims", Some("buyer-token"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fx
            .app
            .oneshot(request("GET", "/claims", Some("admin-token"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rating_scores_are_bounded() {
        let fx = fixture().await;
        let body = format!(
            r#"{{"user_id":{},"event_id":{},"score":6}}"#,
            fx.buyer_id, fx.event_id
        );
        let response = fx
            .app
            .oneshot(request(
                "POST",
                "/ratings",
                Some("buyer-token"),
                Some(&body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn organizers_create_events_only_through_their_own_profile() {
        let fx = fixture().await;
        // Declaring a profile id that is not the caller's.
        let body = serde_json::json!({
            "title": "Fake Fest",
            "start_date": Utc::now(),
            "end_date": Utc::now(),
            "district_id": 1,
            "category_id": 1,
            "organizer_id": 9999,
            "organizer_user_id": fx.organizer_user_id,
        })
        .to_string();

        let response = fx
            .app
            .clone()
            .oneshot(request(
                "POST",
                "/events",
                Some("organizer-token"),
                Some(&body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // A buyer with no profile is rejected as invalid input.
        let response = fx
            .app
            .oneshot(request("POST", "/events", Some("buyer-token"), Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
