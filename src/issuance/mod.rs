//! Redemption-code issuance for tickets.
//!
//! Codes are short numeric strings printed into QR codes and scanned at the
//! gate, so they must be unguessable: fixed-width decimal, drawn from the
//! operating system's CSPRNG, never sequential. Uniqueness is guaranteed by
//! the store's constraint on the code column; this module's job is to keep
//! drawing until an insert wins, invisibly to the caller.

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::Rng;

use crate::models::Ticket;
use crate::store::{Store, StoreError, StoreResult};
use crate::utils::error::AppError;

/// Redemption codes are exactly this many decimal digits.
pub const CODE_LENGTH: usize = 12;

/// Collisions occur at ~1e-12 per draw in a populated system; a redraw loop
/// that runs this many times without winning means the random source is
/// broken, not that the space is exhausted.
pub const MAX_ATTEMPTS: u32 = 20;

/// The single store capability issuance needs: atomically claim a code for
/// a new ticket, reporting a taken code distinguishably.
#[async_trait]
pub trait TicketInserter: Send + Sync {
    async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket>;
}

#[async_trait]
impl<S: Store + ?Sized> TicketInserter for S {
    async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket> {
        Store::insert_ticket(self, purchase_id, code).await
    }
}

/// Draws one candidate code from the OS CSPRNG.
fn draw_code() -> String {
    let mut rng = OsRng;
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Issues a ticket for `purchase_id` with a globally unique redemption code.
///
/// Two concurrent calls may draw the same candidate; the store's uniqueness
/// constraint lets exactly one insert win and the loser redraws. Retries are
/// silent; only exhaustion surfaces, as a `Conflict`.
pub async fn issue_ticket<S>(store: &S, purchase_id: i64) -> Result<Ticket, AppError>
where
    S: TicketInserter + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let code = draw_code();
        match store.insert_ticket(purchase_id, &code).await {
            Ok(ticket) => return Ok(ticket),
            Err(StoreError::UniqueViolation) => {
                tracing::debug!(purchase_id, attempt, "redemption code collision, redrawing");
            }
            Err(other) => return Err(AppError::DatabaseError(other)),
        }
    }

    tracing::error!(
        purchase_id,
        attempts = MAX_ATTEMPTS,
        "redemption code space reported exhausted; random source is suspect"
    );
    Err(AppError::Conflict(
        "Could not allocate a unique redemption code".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn is_well_formed(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
    }

    #[test]
    fn drawn_codes_are_twelve_decimal_digits_and_collision_free_in_practice() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let code = draw_code();
            assert!(is_well_formed(&code), "malformed code: {code}");
            assert!(seen.insert(code), "duplicate code within 10,000 draws");
        }
    }

    #[tokio::test]
    async fn issued_tickets_get_distinct_codes() {
        let store = MemoryStore::new();
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let ticket = issue_ticket(&store, 1).await.unwrap();
            assert!(is_well_formed(&ticket.code));
            assert!(seen.insert(ticket.code));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_issuance_never_duplicates() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for purchase_id in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                issue_ticket(store.as_ref(), purchase_id).await.unwrap().code
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            let code = handle.await.unwrap();
            assert!(seen.insert(code), "two concurrent issuances shared a code");
        }
    }

    /// Reports the first `collisions` inserts as taken, then accepts.
    struct CollidingInserter {
        collisions: AtomicU32,
        attempts: AtomicU32,
    }

    impl CollidingInserter {
        fn new(collisions: u32) -> Self {
            Self {
                collisions: AtomicU32::new(collisions),
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TicketInserter for CollidingInserter {
        async fn insert_ticket(&self, purchase_id: i64, code: &str) -> StoreResult<Ticket> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let remaining = self.collisions.load(Ordering::SeqCst);
            if remaining > 0 {
                self.collisions.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::UniqueViolation);
            }
            Ok(Ticket {
                id: 1,
                purchase_id,
                code: code.to_string(),
                status: crate::models::TicketStatus::Active,
                created_at: chrono::Utc::now(),
                used_at: None,
                verifier_id: None,
            })
        }
    }

    #[tokio::test]
    async fn collisions_are_recovered_by_redrawing() {
        let store = CollidingInserter::new(3);
        let ticket = issue_ticket(&store, 5).await.unwrap();
        assert!(is_well_formed(&ticket.code));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn retry_exhaustion_surfaces_as_conflict() {
        let store = CollidingInserter::new(u32::MAX);
        let err = issue_ticket(&store, 5).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.attempts.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn backend_failures_are_not_retried() {
        struct BrokenInserter;

        #[async_trait]
        impl TicketInserter for BrokenInserter {
            async fn insert_ticket(&self, _: i64, _: &str) -> StoreResult<Ticket> {
                Err(StoreError::Backend("connection reset".to_string()))
            }
        }

        let err = issue_ticket(&BrokenInserter, 5).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
