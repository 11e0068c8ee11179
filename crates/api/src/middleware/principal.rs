//! Principal extractor for Axum handlers.
//!
//! Sign-in happens upstream. By the time a request reaches this service the
//! authenticated identity has been reduced to an email address carried in
//! the [`PRINCIPAL_HEADER`] header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use planner_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's email.
pub const PRINCIPAL_HEADER: &str = "x-user-email";

/// The opaque identity of the caller. It is resolved to a user record only
/// by the operations that need one.
///
/// ```ignore
/// async fn my_handler(principal: Principal) -> AppResult<Json<()>> {
///     tracing::info!(email = %principal.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {PRINCIPAL_HEADER} header"
                )))
            })?;

        Ok(Principal {
            email: email.to_string(),
        })
    }
}
