/// Primary key of every record this service owns (messages, notifications,
/// payments). Generated as UUIDv7 so ids sort roughly by creation time.
pub type RecordId = uuid::Uuid;

/// User identity issued by the external authentication service.
pub type UserId = String;

/// Project identity issued by the external project service. A project id is
/// also the conversation id of its message channel.
pub type ProjectId = String;

/// Per-conversation message position, starting at 1.
pub type SequenceNumber = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh record id.
pub fn new_record_id() -> RecordId {
    uuid::Uuid::now_v7()
}

/// Field validator for user, project and conversation ids: whitespace-only
/// ids never resolve to anyone.
pub fn validate_id(id: &str) -> Result<(), validator::ValidationError> {
    if id.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_id")
            .with_message("id must not be blank".into()));
    }
    Ok(())
}
