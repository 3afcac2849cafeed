use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::entry::{
    CreateEntryRequest, EntryFilterQuery, JournalEntry, UpdateEntryRequest,
};
use crate::services::reflection;
use crate::AppState;

/// Writes to the journal are capped per user (the AI call makes them the
/// most expensive route in the API).
const CREATE_MAX_PER_MINUTE: u32 = 5;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let key = format!("journal-create:{}", auth_user.id);
    if state
        .rate_limiter
        .check_with_limits(&key, CREATE_MAX_PER_MINUTE, 60)
        .await
        .is_err()
    {
        return Err(AppError::RateLimited);
    }

    // Reflection is best-effort: a failed or unconfigured model call never
    // blocks the entry itself.
    let reflection = match reflection::generate_reflection(
        &state.config,
        &body.content,
        body.mood.as_deref(),
    )
    .await
    {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %e, "Reflection unavailable, saving entry without it");
            None
        }
    };

    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        INSERT INTO journal_entries (id, user_id, title, content, mood, reflection)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(&body.content)
    .bind(&body.mood)
    .bind(&reflection)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(serde_json::json!({
        "message": "Entry saved",
        "entry": entry,
    })))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}

/// Absent entries and entries owned by someone else are indistinguishable to
/// the caller: both are 404.
pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<JournalEntry>> {
    let entry = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM journal_entries WHERE id = $1 AND user_id = $2",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Only title/content/mood are mutable; reflection and created_at never change.
    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        UPDATE journal_entries SET
            title = COALESCE($3, title),
            content = COALESCE($4, content),
            mood = COALESCE($5, mood),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(&body.content)
    .bind(&body.mood)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(serde_json::json!({
        "message": format!("Entry {} updated", entry_id),
        "entry": entry,
    })))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    Ok(Json(serde_json::json!({
        "message": format!("Entry {} deleted", entry_id),
    })))
}

pub async fn filter_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryFilterQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);
    let search_pattern = query.search.as_ref().map(|s| format!("%{}%", s));

    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = $1
          AND ($2::text IS NULL OR mood = $2)
          AND ($3::text IS NULL OR title ILIKE $3 OR content ILIKE $3)
          AND ($4::timestamptz IS NULL OR created_at >= $4)
          AND ($5::timestamptz IS NULL OR created_at <= $5)
        ORDER BY created_at DESC
        LIMIT $6 OFFSET $7
        "#,
    )
    .bind(auth_user.id)
    .bind(&query.mood)
    .bind(&search_pattern)
    .bind(query.start_date)
    .bind(query.end_date)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    if entries.is_empty() {
        return Err(AppError::NotFound(
            "No entries match the given filters".into(),
        ));
    }

    Ok(Json(entries))
}
