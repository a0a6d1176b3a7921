pub mod events;
pub mod messages;
pub mod notifications;
pub mod payments;

use gigline_core::error::CoreError;
use gigline_db::models::project::Project;

use crate::error::AppResult;
use crate::state::AppState;

/// Load a project or fail with 404.
pub(crate) async fn require_project(state: &AppState, project_id: &str) -> AppResult<Project> {
    state
        .projects
        .find_project(project_id)
        .await
        .map_err(CoreError::from)?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Project",
                id: project_id.to_string(),
            }
            .into()
        })
}
