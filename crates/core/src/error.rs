use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a non-id key, e.g. a user resolved by email.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = CoreError::NotFound {
            entity: "Project",
            id: 42,
        };
        assert_eq!(err.to_string(), "Entity not found: Project with id 42");
    }

    #[test]
    fn display_not_found_by_key() {
        let err = CoreError::NotFoundByKey {
            entity: "User",
            key: "kim@example.com".to_string(),
        };
        assert_eq!(err.to_string(), "Entity not found: User 'kim@example.com'");
    }
}
