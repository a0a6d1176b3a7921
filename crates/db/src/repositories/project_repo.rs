//! Read access to the `projects` table.

use sqlx::PgPool;

use crate::models::project::Project;

pub struct ProjectRepo;

impl ProjectRepo {
    /// Find a project's participants by id.
    pub async fn find_by_id(pool: &PgPool, project_id: &str) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, client_id, freelancer_id FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }
}
