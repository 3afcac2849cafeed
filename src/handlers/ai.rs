use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::services::reflection;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ReflectRequest {
    #[validate(length(min = 1, max = 20000, message = "Entry text must be 1-20000 characters"))]
    pub entry: String,

    #[validate(length(max = 100, message = "Mood must be under 100 characters"))]
    pub mood: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReflectResponse {
    pub reflection: String,
}

/// Standalone reflection on arbitrary text, without persisting anything.
/// Unlike journal creation, a failed model call here is the whole result,
/// so it surfaces as an error.
pub async fn reflect(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ReflectRequest>,
) -> AppResult<Json<ReflectResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let key = format!("ai-reflect:{}", auth_user.id);
    if state.rate_limiter.check(&key).await.is_err() {
        return Err(AppError::RateLimited);
    }

    let reflection =
        reflection::generate_reflection(&state.config, &body.entry, body.mood.as_deref())
            .await
            .map_err(AppError::Reflection)?;

    Ok(Json(ReflectResponse { reflection }))
}
