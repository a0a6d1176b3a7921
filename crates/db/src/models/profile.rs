//! Contact details read from the `profiles` table.

use serde::Serialize;
use sqlx::FromRow;

/// Where and how to address a user in outbound email.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: Option<String>,
    pub display_name: Option<String>,
}
