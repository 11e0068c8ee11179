//! Domain rules for the project planner and community board.
//!
//! Everything in this crate is pure: no database, no HTTP. The `planner-db`
//! crate persists what these rules decide, and `planner-api` exposes it.

pub mod comment;
pub mod deadline;
pub mod error;
pub mod flag;
pub mod outcome;
pub mod pagination;
pub mod project;
pub mod reconcile;
pub mod types;
