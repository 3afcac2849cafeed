use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One journal record. `id`, `user_id` and `created_at` are immutable after
/// insertion; `reflection` is written once at creation time and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub reflection: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// The mood label used for analytics grouping. Empty strings count as
    /// unset so typo'd blank moods do not form their own bucket.
    pub fn mood_label(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,

    #[validate(length(max = 100, message = "Mood must be under 100 characters"))]
    pub mood: Option<String>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: Option<String>,

    #[validate(length(max = 100, message = "Mood must be under 100 characters"))]
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntryFilterQuery {
    pub mood: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MoodSummaryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_label_empty_string_is_unset() {
        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            mood: Some(String::new()),
            reflection: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(entry.mood_label(), None);
    }

    #[test]
    fn test_create_request_rejects_empty_title() {
        let req = CreateEntryRequest {
            title: String::new(),
            content: "something".into(),
            mood: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_missing_mood() {
        let req = CreateEntryRequest {
            title: "Morning pages".into(),
            content: "Slept well, feeling okay.".into(),
            mood: None,
        };
        assert!(req.validate().is_ok());
    }
}
