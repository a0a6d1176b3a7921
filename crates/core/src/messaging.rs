//! Conversation message rules.
//!
//! Validation for messages lives here so that the HTTP layer and the
//! message channel reject the same inputs with the same wording.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::types::{ProjectId, UserId};

/// Maximum message length in characters, measured after trimming.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Number of characters of a message quoted in its notification text.
pub const PREVIEW_CHARS: usize = 50;

/// Default page size for history queries.
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// Maximum page size for history queries.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// A message that has not been committed to a conversation yet.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageDraft {
    #[validate(custom(function = "crate::types::validate_id"))]
    pub conversation_id: ProjectId,
    #[validate(custom(function = "crate::types::validate_id"))]
    pub sender_id: UserId,
    #[validate(custom(function = "crate::types::validate_id"))]
    pub recipient_id: UserId,
    pub content: String,
}

impl MessageDraft {
    pub fn new(
        conversation_id: impl Into<ProjectId>,
        sender_id: impl Into<UserId>,
        recipient_id: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            content: content.into(),
        }
    }

    /// Check the draft and return it with normalized content.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.validate()?;
        self.content = normalize_content(&self.content)?;
        Ok(self)
    }
}

/// Trim message content and enforce the length rules.
pub fn normalize_content(content: &str) -> Result<String, CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Message content must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message content exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Notification text for a newly posted message.
pub fn notification_preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("New message: {head}...")
    } else {
        format!("New message: {head}")
    }
}

/// Clamp a requested history page size into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
