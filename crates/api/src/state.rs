use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{AlertService, CommentService, IdentityResolver, ProjectService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: planner_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub identity: IdentityResolver,
    pub alerts: AlertService,
    pub projects: Arc<ProjectService>,
    pub comments: Arc<CommentService>,
}

impl AppState {
    /// Wire every service onto one pool.
    pub fn new(pool: planner_db::DbPool, config: ServerConfig) -> Self {
        let identity = IdentityResolver::new(pool.clone());
        let alerts = AlertService::new(pool.clone());
        let projects = Arc::new(ProjectService::new(pool.clone(), identity.clone()));
        let comments = Arc::new(CommentService::new(
            pool.clone(),
            identity.clone(),
            alerts.clone(),
        ));

        Self {
            pool,
            config: Arc::new(config),
            identity,
            alerts,
            projects,
            comments,
        }
    }
}
