use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored bearer token. Only the SHA-256 digest of the secret is kept;
/// the raw value leaves the process once, inside an `IssuedToken`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: Uuid,
    pub user_id: String,
    /// Unique across all tokens ever created; write-once.
    pub hashed_value: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Reserved for usage tracking; no operation writes it yet.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Set exactly when the token is retired by rotation.
    pub rotated_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A fresh active token owned by `user_id`, carrying the given digest.
    pub fn new(user_id: impl Into<String>, hashed_value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            hashed_value: hashed_value.into(),
            is_active: true,
            created_at: Utc::now(),
            last_used_at: None,
            rotated_at: None,
        }
    }
}

/// Response for `generate` and `rotate`: the raw secret and its owner.
/// The only place a raw secret ever appears.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_starts_active_with_no_rotation_timestamp() {
        let token = Token::new("user1", "abc123");
        assert!(token.is_active);
        assert_eq!(token.user_id, "user1");
        assert_eq!(token.hashed_value, "abc123");
        assert!(token.rotated_at.is_none());
        assert!(token.last_used_at.is_none());
    }

    #[test]
    fn tokens_get_distinct_ids() {
        let a = Token::new("u", "h1");
        let b = Token::new("u", "h2");
        assert_ne!(a.id, b.id);
    }
}
