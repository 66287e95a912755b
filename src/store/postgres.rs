use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audit::{AuditAction, AuditLog};
use crate::models::token::Token;
use crate::store::{AuditTrail, TokenStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn save(&self, token: Token) -> anyhow::Result<Token> {
        // hashed_value is deliberately absent from the UPDATE set: a token
        // is never re-hashed in place.
        let saved = sqlx::query_as::<_, Token>(
            r#"INSERT INTO tokens (id, user_id, hashed_value, is_active, created_at, last_used_at, rotated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (id) DO UPDATE
                   SET is_active = EXCLUDED.is_active,
                       last_used_at = EXCLUDED.last_used_at,
                       rotated_at = EXCLUDED.rotated_at
               RETURNING id, user_id, hashed_value, is_active, created_at, last_used_at, rotated_at"#,
        )
        .bind(token.id)
        .bind(&token.user_id)
        .bind(&token.hashed_value)
        .bind(token.is_active)
        .bind(token.created_at)
        .bind(token.last_used_at)
        .bind(token.rotated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_hash(&self, hashed_value: &str) -> anyhow::Result<Option<Token>> {
        let row = sqlx::query_as::<_, Token>(
            "SELECT id, user_id, hashed_value, is_active, created_at, last_used_at, rotated_at FROM tokens WHERE hashed_value = $1"
        )
        .bind(hashed_value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>> {
        let rows = sqlx::query_as::<_, Token>(
            "SELECT id, user_id, hashed_value, is_active, created_at, last_used_at, rotated_at FROM tokens WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Token>> {
        let rows = sqlx::query_as::<_, Token>(
            "SELECT id, user_id, hashed_value, is_active, created_at, last_used_at, rotated_at FROM tokens WHERE user_id = $1 AND is_active = true"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AuditTrail for PgStore {
    async fn append(
        &self,
        action: AuditAction,
        token_value: &str,
        user_id: &str,
    ) -> anyhow::Result<AuditLog> {
        let entry = AuditLog::new(action, token_value, user_id);

        sqlx::query(
            r#"INSERT INTO audit_logs (id, action, token_value, user_id, created_at)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(entry.id)
        .bind(entry.action.as_str())
        .bind(&entry.token_value)
        .bind(&entry.user_id)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<AuditLog>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            "SELECT id, action, token_value, user_id, created_at FROM audit_logs WHERE user_id = $1 ORDER BY created_at ASC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AuditLogRow::into_entry).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    id: Uuid,
    action: String,
    token_value: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl AuditLogRow {
    fn into_entry(self) -> anyhow::Result<AuditLog> {
        let action = AuditAction::parse(&self.action)
            .ok_or_else(|| anyhow::anyhow!("unknown audit action in storage: {}", self.action))?;
        Ok(AuditLog {
            id: self.id,
            action,
            token_value: self.token_value,
            user_id: self.user_id,
            timestamp: self.created_at,
        })
    }
}
