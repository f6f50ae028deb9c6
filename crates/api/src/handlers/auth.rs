//! Authentication handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use adpulse_core::error::CoreError;
use adpulse_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// POST /api/v1/auth/login
///
/// Verify credentials and issue an access token. Unknown email and bad
/// password produce the same error so the endpoint does not leak which
/// accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim()).await?;

    let valid = user
        .as_ref()
        .map(|u| verify_password(&input.password, &u.password_hash))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| valid) else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    };

    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: LoginResponse { access_token },
    }))
}
