//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes that entity accepts

pub mod alert;
pub mod comment;
pub mod post;
pub mod project;
pub mod task;
pub mod user;
