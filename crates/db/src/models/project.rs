//! Project participants, as far as recipient resolution needs them.

use gigline_core::types::{ProjectId, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub client_id: Option<UserId>,
    /// Unset until a freelancer is hired.
    pub freelancer_id: Option<UserId>,
}

impl Project {
    /// The participant on the other side of `actor_id`.
    ///
    /// When the actor is the client this is the freelancer and vice versa.
    /// Without a recognised actor the freelancer is returned, since status
    /// changes are normally made by the client.
    pub fn counterpart_of(&self, actor_id: Option<&str>) -> Option<&UserId> {
        match actor_id {
            Some(actor) if self.freelancer_id.as_deref() == Some(actor) => {
                self.client_id.as_ref()
            }
            _ => self.freelancer_id.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(client: Option<&str>, freelancer: Option<&str>) -> Project {
        Project {
            id: "proj-1".into(),
            title: "Landing page".into(),
            client_id: client.map(String::from),
            freelancer_id: freelancer.map(String::from),
        }
    }

    #[test]
    fn client_actor_maps_to_freelancer() {
        let p = project(Some("c1"), Some("f1"));
        assert_eq!(p.counterpart_of(Some("c1")).map(String::as_str), Some("f1"));
    }

    #[test]
    fn freelancer_actor_maps_to_client() {
        let p = project(Some("c1"), Some("f1"));
        assert_eq!(p.counterpart_of(Some("f1")).map(String::as_str), Some("c1"));
    }

    #[test]
    fn no_actor_maps_to_freelancer() {
        let p = project(Some("c1"), Some("f1"));
        assert_eq!(p.counterpart_of(None).map(String::as_str), Some("f1"));
    }

    #[test]
    fn unset_counterpart_is_none() {
        let p = project(Some("c1"), None);
        assert!(p.counterpart_of(Some("c1")).is_none());
        assert!(p.counterpart_of(None).is_none());
    }
}
