use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::audit::{AuditAction, AuditLog};
use crate::models::token::Token;
use crate::store::{AuditTrail, TokenStore};

/// In-memory store for tests and local development. Postgres is the
/// production backend; this keeps the same contracts without a database.
#[derive(Default)]
pub struct MemoryStore {
    tokens: DashMap<Uuid, Token>,
    audit: Mutex<Vec<AuditLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn save(&self, token: Token) -> anyhow::Result<Token> {
        // Uniqueness of hashed_value is a storage constraint in PG;
        // enforce the same here so tests see identical behavior.
        let duplicate = self.tokens.iter().any(|entry| {
            entry.hashed_value == token.hashed_value && entry.id != token.id
        });
        if duplicate {
            anyhow::bail!("hashed_value already exists: {}", token.hashed_value);
        }

        self.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, hashed_value: &str) -> anyhow::Result<Option<Token>> {
        Ok(self
            .tokens
            .iter()
            .find(|entry| entry.hashed_value == hashed_value)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>> {
        let mut tokens: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by_key(|t| t.created_at);
        Ok(tokens)
    }

    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>> {
        let mut tokens: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.is_active)
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by_key(|t| t.created_at);
        Ok(tokens)
    }
}

#[async_trait]
impl AuditTrail for MemoryStore {
    async fn append(
        &self,
        action: AuditAction,
        token_value: &str,
        user_id: &str,
    ) -> anyhow::Result<AuditLog> {
        let entry = AuditLog::new(action, token_value, user_id);
        self.audit
            .lock()
            .map_err(|_| anyhow::anyhow!("audit log lock poisoned"))?
            .push(entry.clone());
        Ok(entry)
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<AuditLog>> {
        Ok(self
            .audit
            .lock()
            .map_err(|_| anyhow::anyhow!("audit log lock poisoned"))?
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }
}
