use serde::{Deserialize, Serialize};

/// Closed set of roles a user can hold. Stored as text; the variants are the
/// whole universe, so a typo in a role name is a compile error rather than a
/// silent deny (or worse, a silent allow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Organizer,
    Buyer,
    Verifier,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Administrator,
        Role::Organizer,
        Role::Buyer,
        Role::Verifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Organizer => "organizer",
            Role::Buyer => "buyer",
            Role::Verifier => "verifier",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    /// Gate-scanning capability: reading tickets by redemption code and
    /// flipping their status at the door.
    pub fn can_validate_tickets(&self) -> bool {
        matches!(self, Role::Administrator | Role::Verifier)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Buyer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_the_only_admin() {
        assert!(Role::Administrator.is_admin());
        assert!(!Role::Organizer.is_admin());
        assert!(!Role::Buyer.is_admin());
        assert!(!Role::Verifier.is_admin());
    }

    #[test]
    fn validation_capability_covers_admin_and_verifier() {
        assert!(Role::Administrator.can_validate_tickets());
        assert!(Role::Verifier.can_validate_tickets());
        assert!(!Role::Organizer.can_validate_tickets());
        assert!(!Role::Buyer.can_validate_tickets());
    }
}
