use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed vocabulary of auditable lifecycle actions.
/// Stored as TEXT in these exact spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Generate,
    RotateOld,
    RotateNew,
    Invalidate,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Generate => "GENERATE",
            AuditAction::RotateOld => "ROTATE_OLD",
            AuditAction::RotateNew => "ROTATE_NEW",
            AuditAction::Invalidate => "INVALIDATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GENERATE" => Some(AuditAction::Generate),
            "ROTATE_OLD" => Some(AuditAction::RotateOld),
            "ROTATE_NEW" => Some(AuditAction::RotateNew),
            "INVALIDATE" => Some(AuditAction::Invalidate),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only record of a state-changing action.
/// `token_value` is always the digest, never the raw secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub token_value: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(action: AuditAction, token_value: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            token_value: token_value.into(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
        }
    }
}
