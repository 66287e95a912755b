pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::audit::{AuditAction, AuditLog};
use crate::models::token::Token;

/// Abstraction over durable token storage.
/// Implementations: `PgStore` (PostgreSQL), `MemoryStore` (tests/local dev).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Upsert a token. Inserts on first save; later saves may only flip
    /// `is_active` and set `rotated_at`/`last_used_at` — `hashed_value`
    /// is write-once.
    async fn save(&self, token: Token) -> anyhow::Result<Token>;

    /// Look up a token by the digest of its secret.
    async fn find_by_hash(&self, hashed_value: &str) -> anyhow::Result<Option<Token>>;

    /// All tokens owned by a user, active or not, in storage order.
    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>>;

    /// Only the user's tokens with `is_active = true`.
    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>>;
}

/// Append-only audit trail. No update or delete path exists.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Record one lifecycle action against a token digest.
    async fn append(
        &self,
        action: AuditAction,
        token_value: &str,
        user_id: &str,
    ) -> anyhow::Result<AuditLog>;

    /// All audit entries for a user, oldest first.
    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<AuditLog>>;
}
