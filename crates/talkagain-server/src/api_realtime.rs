//! Real-time voice token endpoint.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use std::sync::Arc;
use talkagain_types::AccessTokenResponse;

/// Handler for `GET /api/hume/access-token`.
///
/// Hands the browser a short-lived token for a direct session with the
/// real-time voice provider. Never answers 200 without a token.
pub async fn access_token_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let access_token = state
        .realtime_tokens
        .fetch_access_token()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "real-time access token request failed");
            ApiError::from(e)
        })?;

    Ok(Json(AccessTokenResponse { access_token }))
}
