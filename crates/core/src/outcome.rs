//! Outcome of a write entry point whose target or parent may be missing.
//!
//! Write paths (create on a missing owner or post, update/delete/activate on
//! a missing project) return normally without touching the store. Instead of
//! hiding that in a `()` return, they report [`WriteOutcome::SkippedMissingParent`]
//! and let the HTTP boundary decide whether a skip is silent or an error.

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    /// The write went through.
    Applied(T),
    /// Nothing was written because the named entity does not exist.
    SkippedMissingParent {
        entity: &'static str,
        /// The key the caller supplied (numeric id or email).
        id: String,
    },
}

impl<T> WriteOutcome<T> {
    pub fn skipped(entity: &'static str, id: impl ToString) -> Self {
        Self::SkippedMissingParent {
            entity,
            id: id.to_string(),
        }
    }

    /// Treat a skip as a lookup failure.
    pub fn into_strict(self) -> Result<T, CoreError> {
        match self {
            Self::Applied(value) => Ok(value),
            Self::SkippedMissingParent { entity, id } => {
                Err(CoreError::NotFoundByKey { entity, key: id })
            }
        }
    }
}
