//! Analytics endpoints. Each handler loads the caller's entries and hands
//! them to `services::analytics`; no aggregation happens here.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::entry::{JournalEntry, MoodSummaryQuery};
use crate::services::analytics;
use crate::AppState;

async fn load_entries(state: &AppState, user_id: Uuid) -> AppResult<Vec<JournalEntry>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(entries)
}

pub async fn mood_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MoodSummaryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let entries = load_entries(&state, auth_user.id).await?;
    let summary = analytics::mood_summary(&entries, query.start_date, query.end_date);

    Ok(Json(serde_json::json!({ "summary": summary })))
}

pub async fn mood_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<analytics::MoodTrendPoint>>> {
    let entries = load_entries(&state, auth_user.id).await?;
    Ok(Json(analytics::mood_trends(&entries)))
}

pub async fn streak(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<analytics::StreakSummary>> {
    let entries = load_entries(&state, auth_user.id).await?;
    let today = Utc::now().date_naive();
    Ok(Json(analytics::streaks(&entries, today)))
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let entries = load_entries(&state, auth_user.id).await?;

    match analytics::stats(&entries) {
        Some(stats) => Ok(Json(serde_json::to_value(stats).map_err(anyhow::Error::from)?)),
        None => Ok(Json(
            serde_json::json!({ "message": "No journal entries found." }),
        )),
    }
}

pub async fn seven_day_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let entries = load_entries(&state, auth_user.id).await?;
    let today = Utc::now().date_naive();
    let digest = analytics::seven_day_digest(&entries, today);

    Ok(Json(serde_json::json!({ "last_7_days": digest })))
}
