//! Central access-policy evaluator. Every mutating or sensitive-read
//! endpoint funnels through [`authorize`] with a closed [`Action`]; an
//! action with no matching allow-predicate is denied.
//!
//! Existence is the handler's concern and is checked first: by the time an
//! action reaches this module the target resource is known to exist, so a
//! denial here is always `Forbidden`, never `NotFound`.

use crate::auth::Principal;
use crate::models::{Event, Organizer, Role, Ticket};
use crate::store::Store;
use crate::utils::error::AppError;

/// Everything a principal can ask to do that is not public. Variants carry
/// the owning references the rules compare against, not whole payloads.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    ReadUser(i64),
    UpdateUser(i64),
    ListUsers,

    /// Organizers create events through their own profile, and the payload
    /// must declare that same profile.
    CreateEvent {
        organizer: &'a Organizer,
        declared_organizer_id: i64,
    },
    UpdateEvent(&'a Event),
    DeleteEvent(&'a Event),
    AssignEventVerifier(&'a Event),
    RemoveEventVerifier(&'a Event),
    CreateTicketType(&'a Event),
    UpdateTicketType(&'a Event),
    DeleteTicketType(&'a Event),

    UpdateOrganizer(&'a Organizer),
    UpdateVerifier { profile_user_id: i64 },

    /// Creating a favorite, rating, report or purchase on a user's behalf.
    CreateForUser { owner_id: i64 },
    /// Reading a purchase, its details, a report, or a favorites list that
    /// belongs to a user.
    ReadOwned { owner_id: i64 },
    DeleteFavorite { owner_id: i64 },

    CreateTicket { purchase_owner_id: i64 },
    ReadTicket { purchase_owner_id: i64 },
    LookupTicketByCode,
    ValidateTicket,

    ModerateReports,
    ModerateClaims,
    ModerateContact,
}

pub fn authorize(principal: &Principal, action: Action<'_>) -> Result<(), AppError> {
    let allowed = match action {
        Action::ReadUser(user_id) | Action::UpdateUser(user_id) => {
            principal.is_admin() || principal.user_id == user_id
        }

        Action::ListUsers
        | Action::ModerateReports
        | Action::ModerateClaims
        | Action::ModerateContact => principal.is_admin(),

        Action::CreateEvent {
            organizer,
            declared_organizer_id,
        } => {
            principal.role == Role::Organizer
                && organizer.user_id == principal.user_id
                && organizer.id == declared_organizer_id
        }

        Action::UpdateEvent(event)
        | Action::DeleteEvent(event)
        | Action::AssignEventVerifier(event)
        | Action::RemoveEventVerifier(event)
        | Action::CreateTicketType(event)
        | Action::UpdateTicketType(event)
        | Action::DeleteTicketType(event) => {
            principal.is_admin() || principal.user_id == event.organizer_user_id
        }

        Action::UpdateOrganizer(organizer) => {
            principal.is_admin() || principal.user_id == organizer.user_id
        }
        Action::UpdateVerifier { profile_user_id } => {
            principal.is_admin() || principal.user_id == profile_user_id
        }

        Action::CreateForUser { owner_id }
        | Action::ReadOwned { owner_id }
        | Action::DeleteFavorite { owner_id } => {
            principal.is_admin() || principal.user_id == owner_id
        }

        Action::CreateTicket { purchase_owner_id } => {
            principal.is_admin() || principal.user_id == purchase_owner_id
        }
        Action::ReadTicket { purchase_owner_id } => {
            principal.role.can_validate_tickets() || principal.user_id == purchase_owner_id
        }

        Action::LookupTicketByCode | Action::ValidateTicket => {
            principal.role.can_validate_tickets()
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not enough permissions".to_string()))
    }
}

/// List-endpoint narrowing: a non-admin asking for another user's rows (or
/// none in particular) gets their own rows instead of a denial.
pub fn narrow_owner_filter(principal: &Principal, requested: Option<i64>) -> Option<i64> {
    if principal.is_admin() {
        requested
    } else {
        match requested {
            Some(id) if id == principal.user_id => Some(id),
            _ => Some(principal.user_id),
        }
    }
}

/// Ticket-list variant: verifiers see every ticket, like admins.
pub fn narrow_ticket_filter(principal: &Principal, requested: Option<i64>) -> Option<i64> {
    if principal.role.can_validate_tickets() {
        requested
    } else {
        narrow_owner_filter(principal, requested)
    }
}

// Derived-ownership lookups. Resources owned through a relation resolve
// their owning user here instead of ad hoc joins in handlers.

/// A ticket is owned by the user behind its purchase.
pub async fn ticket_owner(store: &dyn Store, ticket: &Ticket) -> Result<i64, AppError> {
    let purchase = store.get_purchase(ticket.purchase_id).await.map_err(|_| {
        AppError::InternalServerError("Ticket references a missing purchase".to_string())
    })?;
    Ok(purchase.user_id)
}

/// A ticket type is owned through its event.
pub async fn event_for_ticket_type(
    store: &dyn Store,
    event_id: i64,
) -> Result<Event, AppError> {
    store.get_event(event_id).await.map_err(|_| {
        AppError::InternalServerError("Ticket type references a missing event".to_string())
    })
}

/// A verifier assignment is owned through its event.
pub async fn event_for_assignment(
    store: &dyn Store,
    event_id: i64,
) -> Result<Event, AppError> {
    store.get_event(event_id).await.map_err(|_| {
        AppError::InternalServerError("Assignment references a missing event".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn principal(user_id: i64, role: Role) -> Principal {
        Principal { user_id, role }
    }

    fn event(id: i64, organizer_user_id: i64) -> Event {
        Event {
            id,
            title: "Concert".to_string(),
            description: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            district_id: 1,
            location_description: None,
            category_id: 1,
            organizer_id: 1,
            organizer_user_id,
            image_url: None,
            status: "active".to_string(),
        }
    }

    fn organizer(id: i64, user_id: i64) -> Organizer {
        Organizer {
            id,
            user_id,
            document_type: "DNI".to_string(),
            document_number: "12345678".to_string(),
            business_name: None,
            ruc: None,
            work_certificate_file: None,
            is_approved: true,
            approval_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn event_update_allows_exactly_admin_and_owner() {
        let target = event(3, 9);

        // Buyer id=7 against an event owned by 9: denied.
        let buyer = principal(7, Role::Buyer);
        assert!(authorize(&buyer, Action::UpdateEvent(&target)).is_err());

        // Same buyer against an event they own: allowed.
        let own = event(3, 7);
        assert!(authorize(&buyer, Action::UpdateEvent(&own)).is_ok());

        // Admin always.
        let admin = principal(1, Role::Administrator);
        assert!(authorize(&admin, Action::UpdateEvent(&target)).is_ok());

        // A verifier is neither.
        let verifier = principal(8, Role::Verifier);
        assert!(authorize(&verifier, Action::UpdateEvent(&target)).is_err());
    }

    #[test]
    fn event_creation_requires_own_matching_profile() {
        let profile = organizer(5, 7);
        let owner = principal(7, Role::Organizer);

        assert!(authorize(
            &owner,
            Action::CreateEvent {
                organizer: &profile,
                declared_organizer_id: 5,
            }
        )
        .is_ok());

        // Declaring someone else's profile is denied.
        assert!(authorize(
            &owner,
            Action::CreateEvent {
                organizer: &profile,
                declared_organizer_id: 6,
            }
        )
        .is_err());

        // Right profile, wrong role.
        let buyer = principal(7, Role::Buyer);
        assert!(authorize(
            &buyer,
            Action::CreateEvent {
                organizer: &profile,
                declared_organizer_id: 5,
            }
        )
        .is_err());

        // Admins do not create events on behalf of organizers.
        let admin = principal(1, Role::Administrator);
        assert!(authorize(
            &admin,
            Action::CreateEvent {
                organizer: &profile,
                declared_organizer_id: 5,
            }
        )
        .is_err());
    }

    #[test]
    fn profile_and_user_access_is_self_or_admin() {
        let admin = principal(1, Role::Administrator);
        let me = principal(7, Role::Buyer);

        assert!(authorize(&me, Action::ReadUser(7)).is_ok());
        assert!(authorize(&me, Action::UpdateUser(7)).is_ok());
        assert!(authorize(&me, Action::ReadUser(8)).is_err());
        assert!(authorize(&admin, Action::ReadUser(8)).is_ok());
        assert!(authorize(&me, Action::ListUsers).is_err());
        assert!(authorize(&admin, Action::ListUsers).is_ok());
    }

    #[test]
    fn ticket_read_extends_to_gate_staff() {
        let owner = principal(7, Role::Buyer);
        let stranger = principal(8, Role::Buyer);
        let verifier = principal(9, Role::Verifier);
        let admin = principal(1, Role::Administrator);

        let action = Action::ReadTicket {
            purchase_owner_id: 7,
        };
        assert!(authorize(&owner, action).is_ok());
        assert!(authorize(&stranger, action).is_err());
        assert!(authorize(&verifier, action).is_ok());
        assert!(authorize(&admin, action).is_ok());
    }

    #[test]
    fn ticket_validation_is_gate_staff_only() {
        assert!(authorize(&principal(1, Role::Administrator), Action::ValidateTicket).is_ok());
        assert!(authorize(&principal(9, Role::Verifier), Action::ValidateTicket).is_ok());
        assert!(authorize(&principal(9, Role::Verifier), Action::LookupTicketByCode).is_ok());
        assert!(authorize(&principal(7, Role::Buyer), Action::ValidateTicket).is_err());
        assert!(authorize(&principal(7, Role::Organizer), Action::LookupTicketByCode).is_err());
    }

    #[test]
    fn moderation_is_admin_only() {
        let admin = principal(1, Role::Administrator);
        let organizer = principal(2, Role::Organizer);
        for action in [
            Action::ModerateReports,
            Action::ModerateClaims,
            Action::ModerateContact,
        ] {
            assert!(authorize(&admin, action).is_ok());
            assert!(authorize(&organizer, action).is_err());
        }
    }

    #[test]
    fn list_narrowing_pins_non_admins_to_self() {
        let me = principal(7, Role::Buyer);
        assert_eq!(narrow_owner_filter(&me, None), Some(7));
        assert_eq!(narrow_owner_filter(&me, Some(7)), Some(7));
        // Asking for someone else silently narrows instead of denying.
        assert_eq!(narrow_owner_filter(&me, Some(9)), Some(7));

        let admin = principal(1, Role::Administrator);
        assert_eq!(narrow_owner_filter(&admin, None), None);
        assert_eq!(narrow_owner_filter(&admin, Some(9)), Some(9));
    }

    #[test]
    fn ticket_narrowing_exempts_verifiers() {
        let verifier = principal(9, Role::Verifier);
        assert_eq!(narrow_ticket_filter(&verifier, None), None);
        assert_eq!(narrow_ticket_filter(&verifier, Some(4)), Some(4));

        let buyer = principal(7, Role::Buyer);
        assert_eq!(narrow_ticket_filter(&buyer, Some(4)), Some(7));
    }
}
