//! The token lifecycle state machine.
//!
//! A token is ACTIVE from creation and goes permanently inactive through
//! rotation or invalidation; there is no path back and no deletion. Every
//! state transition appends exactly one audit entry per affected token,
//! keyed by digest. The service itself is stateless; all mutable state
//! lives behind the injected store contracts.

use std::sync::Arc;

use crate::errors::AppError;
use crate::hasher;
use crate::models::audit::AuditAction;
use crate::models::token::{IssuedToken, Token};
use crate::store::{AuditTrail, TokenStore};

#[derive(Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenStore>,
    audit: Arc<dyn AuditTrail>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenStore>, audit: Arc<dyn AuditTrail>) -> Self {
        Self { tokens, audit }
    }

    /// Issue a brand-new token for `user_id`. Always succeeds; the user id
    /// is treated as an opaque principal and is not validated here.
    ///
    /// The returned `IssuedToken` is the only copy of the raw secret.
    pub async fn generate(&self, user_id: &str) -> Result<IssuedToken, AppError> {
        tracing::info!("Generating token for user '{}'", user_id);
        let raw = hasher::generate_secret();
        let hashed = hasher::hash(&raw);

        let token = self.tokens.save(Token::new(user_id, &hashed)).await?;
        self.audit
            .append(AuditAction::Generate, &hashed, user_id)
            .await?;
        tracing::debug!("Generated token {} for user '{}'", token.id, user_id);

        Ok(IssuedToken {
            token: raw,
            user_id: user_id.to_string(),
        })
    }

    /// Retire the token behind `old_raw` and issue a replacement for the
    /// same owner. The old token is deactivated, never deleted, so the
    /// audit history stays attached to it.
    ///
    /// The two writes are not atomic: if the new-token insert fails after
    /// the old token was deactivated, the user is left with no active
    /// token. Closing that gap is a transactional-boundary concern of the
    /// storage layer, not compensated here.
    pub async fn rotate(&self, old_raw: &str) -> Result<IssuedToken, AppError> {
        let hashed_old = hasher::hash(old_raw);
        let mut old_token = match self.tokens.find_by_hash(&hashed_old).await? {
            Some(token) => token,
            None => {
                tracing::error!("Token rotation failed: token not found - {}", hashed_old);
                return Err(AppError::TokenNotFound);
            }
        };
        if !old_token.is_active {
            tracing::warn!("Token already invalid: {}", hashed_old);
            return Err(AppError::TokenAlreadyInvalid);
        }

        old_token.is_active = false;
        old_token.rotated_at = Some(chrono::Utc::now());
        let old_token = self.tokens.save(old_token).await?;

        let new_raw = hasher::generate_secret();
        let new_hashed = hasher::hash(&new_raw);
        self.tokens
            .save(Token::new(&old_token.user_id, &new_hashed))
            .await?;

        tracing::info!("Token rotated for user '{}'.", old_token.user_id);
        self.audit
            .append(AuditAction::RotateOld, &hashed_old, &old_token.user_id)
            .await?;
        self.audit
            .append(AuditAction::RotateNew, &new_hashed, &old_token.user_id)
            .await?;

        Ok(IssuedToken {
            token: new_raw,
            user_id: old_token.user_id,
        })
    }

    /// Permanently deactivate the token behind `raw`.
    ///
    /// Invalidating an already-inactive token is a pass-through: the write
    /// is a value-level no-op but a duplicate INVALIDATE audit entry is
    /// still appended. Rotate, in contrast, rejects inactive tokens.
    pub async fn invalidate(&self, raw: &str) -> Result<(), AppError> {
        let hashed = hasher::hash(raw);
        tracing::info!("Attempting to invalidate token: {}", hashed);
        let mut token = match self.tokens.find_by_hash(&hashed).await? {
            Some(token) => token,
            None => {
                tracing::error!("Token invalidation failed: token not found - {}", hashed);
                return Err(AppError::TokenNotFound);
            }
        };

        token.is_active = false;
        let token = self.tokens.save(token).await?;
        tracing::info!("Token invalidated for user '{}'.", token.user_id);
        self.audit
            .append(AuditAction::Invalidate, &hashed, &token.user_id)
            .await?;

        Ok(())
    }

    /// All tokens owned by `user_id`, active and retired. Unknown users get
    /// an empty list, never an error.
    pub async fn list_tokens(&self, user_id: &str) -> Result<Vec<Token>, AppError> {
        tracing::info!("Listing tokens for user '{}'", user_id);
        Ok(self.tokens.find_by_user(user_id).await?)
    }

    /// Only the currently-active tokens for `user_id`; filtering happens at
    /// the storage layer.
    pub async fn list_active_tokens(&self, user_id: &str) -> Result<Vec<Token>, AppError> {
        tracing::info!("Listing active tokens for user '{}'", user_id);
        Ok(self.tokens.find_active_by_user(user_id).await?)
    }
}
