use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub price: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTicketType {
    pub event_id: i64,
    pub name: String,
    pub price: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketTypePatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub capacity: Option<i32>,
}

impl TicketTypePatch {
    pub fn apply(&self, ticket_type: &mut TicketType) {
        if let Some(v) = &self.name {
            ticket_type.name = v.clone();
        }
        if let Some(v) = self.price {
            ticket_type.price = v;
        }
        if let Some(v) = self.capacity {
            ticket_type.capacity = v;
        }
    }
}

/// Ticket lifecycle. A ticket enters the world `active` and only ever moves
/// forward: `active` → `used`, and `active`/`used` → `expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Used,
    Expired,
}

impl TicketStatus {
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        match (self, next) {
            (TicketStatus::Active, TicketStatus::Used) => true,
            (TicketStatus::Active, TicketStatus::Expired) => true,
            (TicketStatus::Used, TicketStatus::Expired) => true,
            (current, next) => current == next,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    /// The purchase this ticket was issued for; never reassigned.
    pub purchase_id: i64,
    /// 12-digit redemption code, unique across all tickets ever issued.
    pub code: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    /// Verifier profile that validated the ticket at the gate, if any.
    pub verifier_id: Option<i64>,
}

/// The only mutable surface of a ticket: validation state. The redemption
/// code and purchase binding are immutable once issued.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPatch {
    pub status: Option<TicketStatus>,
    pub used_at: Option<DateTime<Utc>>,
    pub verifier_id: Option<i64>,
}

impl TicketPatch {
    pub fn apply(&self, ticket: &mut Ticket) {
        if let Some(v) = self.status {
            ticket.status = v;
        }
        if let Some(v) = self.used_at {
            ticket.used_at = Some(v);
        }
        if let Some(v) = self.verifier_id {
            ticket.verifier_id = Some(v);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TicketFilter {
    pub purchase_id: Option<i64>,
    /// Owner filter, resolved through the purchase.
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_only_moves_forward() {
        assert!(TicketStatus::Active.can_transition_to(TicketStatus::Used));
        assert!(TicketStatus::Active.can_transition_to(TicketStatus::Expired));
        assert!(TicketStatus::Used.can_transition_to(TicketStatus::Expired));

        assert!(!TicketStatus::Used.can_transition_to(TicketStatus::Active));
        assert!(!TicketStatus::Expired.can_transition_to(TicketStatus::Active));
        assert!(!TicketStatus::Expired.can_transition_to(TicketStatus::Used));
    }

    #[test]
    fn self_transition_is_a_no_op_not_an_error() {
        assert!(TicketStatus::Active.can_transition_to(TicketStatus::Active));
        assert!(TicketStatus::Used.can_transition_to(TicketStatus::Used));
    }
}
