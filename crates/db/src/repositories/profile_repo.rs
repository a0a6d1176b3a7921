//! Read access to the `profiles` table.

use sqlx::PgPool;

use crate::models::profile::Contact;

pub struct ProfileRepo;

impl ProfileRepo {
    /// Contact details for a user, if the profile exists.
    pub async fn find_contact(pool: &PgPool, user_id: &str) -> Result<Option<Contact>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            "SELECT email, full_name AS display_name FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
