//! Notification kinds shared by domain events and persisted notifications.
//!
//! The same tag set is used on the event wire shape (`type`), in the
//! `notifications.kind` column, and by the router's recipient table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What happened, from the point of view of the user being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A freelancer applied to a project.
    Application,
    /// A participant posted to the project conversation.
    Message,
    /// The project changed status.
    ProjectUpdate,
    /// A payment for the project completed.
    Payment,
}

impl NotificationKind {
    /// Every kind, in declaration order.
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Application,
        NotificationKind::Message,
        NotificationKind::ProjectUpdate,
        NotificationKind::Payment,
    ];

    /// Wire / column representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Application => "application",
            NotificationKind::Message => "message",
            NotificationKind::ProjectUpdate => "project_update",
            NotificationKind::Payment => "payment",
        }
    }

    /// Notification title for a project with the given title.
    pub fn title(&self, project_title: &str) -> String {
        match self {
            NotificationKind::Application => format!("New Application for \"{project_title}\""),
            NotificationKind::Message => format!("New Message for \"{project_title}\""),
            NotificationKind::ProjectUpdate => format!("Project Update: \"{project_title}\""),
            NotificationKind::Payment => format!("Payment Update for \"{project_title}\""),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown notification type '{s}'")))
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn titles_quote_the_project_title() {
        assert_eq!(
            NotificationKind::Application.title("Logo design"),
            "New Application for \"Logo design\""
        );
        assert_eq!(
            NotificationKind::Message.title("Logo design"),
            "New Message for \"Logo design\""
        );
        assert_eq!(
            NotificationKind::ProjectUpdate.title("Logo design"),
            "Project Update: \"Logo design\""
        );
        assert_eq!(
            NotificationKind::Payment.title("Logo design"),
            "Payment Update for \"Logo design\""
        );
    }

    #[test]
    fn parses_every_wire_name() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_wire_name_is_a_validation_error() {
        assert_matches!(
            "refund".parse::<NotificationKind>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&NotificationKind::ProjectUpdate).unwrap();
        assert_eq!(json, "\"project_update\"");
    }
}
