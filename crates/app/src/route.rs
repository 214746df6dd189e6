use crud_client::NEW_RECORD_ID;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("missing entity name in route")]
    MissingEntity,
    #[error("missing entity id in route")]
    MissingId,
}

/// Route parameters of a detail view: `/{entity}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRoute {
    pub entity: String,
    pub id: String,
}

impl EntityRoute {
    pub fn parse(entity: &str, id: &str) -> Result<Self, RouteError> {
        if entity.is_empty() {
            return Err(RouteError::MissingEntity);
        }
        if id.is_empty() {
            return Err(RouteError::MissingId);
        }
        Ok(EntityRoute {
            entity: entity.to_string(),
            id: id.to_string(),
        })
    }

    /// The nil-UUID id routes the detail view into create mode.
    pub fn is_create(&self) -> bool {
        self.id == NEW_RECORD_ID
    }
}
