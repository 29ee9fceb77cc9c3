use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::cookie::extract_session_id;
use crate::shared::{AppError, AppState};

/// Session cookie middleware - resolves the `tradovate_session` cookie to a
/// live session and adds the `SessionModel` to request extensions.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::require_session))
/// Handlers can then extract Extension(session): Extension<SessionModel>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = extract_session_id(req.headers()).ok_or_else(|| {
        warn!("Request without session cookie");
        AppError::Unauthorized("Not authenticated. Please log in first.".to_string())
    })?;

    // Expired and evicted sessions look the same as unknown ones
    let session = state
        .session_repository
        .get_session(&session_id)
        .ok_or_else(|| {
            warn!(session_id = %session_id, "Session not found or expired");
            AppError::Unauthorized("Session expired. Please log in again.".to_string())
        })?;

    debug!(
        session_id = %session.id,
        username = %session.username,
        "Session resolved, adding to request"
    );

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
