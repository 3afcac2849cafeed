//! Read-only summaries over a single user's journal entries.
//!
//! Every function here is pure: it takes an in-memory slice already scoped to
//! one owner by the caller, performs no I/O, and never fails: "no data" is a
//! normal return value (empty map, zero streaks, `None` stats). Days are UTC
//! calendar dates of `created_at`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::entry::JournalEntry;

/// Mood label → count for that date, ascending by date.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MoodTrendPoint {
    pub date: NaiveDate,
    pub moods: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JournalStats {
    pub total_entries: usize,
    pub first_entry: DateTime<Utc>,
    pub latest_entry: DateTime<Utc>,
    pub total_words: usize,
    pub average_words_per_entry: f64,
    pub most_common_mood: Option<String>,
}

/// One day of the rolling digest.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct DaySummary {
    pub count: i64,
    pub moods: BTreeMap<String, i64>,
}

/// Count entries per mood label within the inclusive `[start, end]` bound.
/// Entries without a mood are excluded from this map entirely (unlike the
/// 7-day digest, which buckets them as "unspecified").
pub fn mood_summary(
    entries: &[JournalEntry],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> BTreeMap<String, i64> {
    let mut summary = BTreeMap::new();
    for entry in entries {
        if start.is_some_and(|s| entry.created_at < s) || end.is_some_and(|e| entry.created_at > e)
        {
            continue;
        }
        if let Some(mood) = entry.mood_label() {
            *summary.entry(mood.to_string()).or_insert(0) += 1;
        }
    }
    summary
}

/// Per-day mood counts for every calendar date with at least one mood-bearing
/// entry, ascending. Days where every entry lacks a mood are omitted.
pub fn mood_trends(entries: &[JournalEntry]) -> Vec<MoodTrendPoint> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    for entry in entries {
        if let Some(mood) = entry.mood_label() {
            *days
                .entry(entry.created_at.date_naive())
                .or_default()
                .entry(mood.to_string())
                .or_insert(0) += 1;
        }
    }
    days.into_iter()
        .map(|(date, moods)| MoodTrendPoint { date, moods })
        .collect()
}

/// Current and longest runs of consecutive calendar days with at least one
/// entry. Same-day multiples collapse to one date; input order is irrelevant.
/// A run only counts as "current" if it reaches yesterday or today.
pub fn streaks(entries: &[JournalEntry], today: NaiveDate) -> StreakSummary {
    let dates: Vec<NaiveDate> = entries
        .iter()
        .map(|e| e.created_at.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let Some(latest) = dates.last().copied() else {
        return StreakSummary {
            current_streak: 0,
            longest_streak: 0,
        };
    };

    let mut current: u32 = 1;
    let mut longest: u32 = 1;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }

    // A streak that ended before yesterday is history, not "current".
    if (today - latest).num_days() > 1 {
        current = 0;
    }

    StreakSummary {
        current_streak: current,
        longest_streak: longest,
    }
}

/// Aggregate stats over the whole collection, or `None` when it is empty.
/// Word counts split `content` on whitespace; the mood tie-break keeps the
/// first-encountered label in entry order.
pub fn stats(entries: &[JournalEntry]) -> Option<JournalStats> {
    if entries.is_empty() {
        return None;
    }

    let total_entries = entries.len();
    let first_entry = entries.iter().map(|e| e.created_at).min()?;
    let latest_entry = entries.iter().map(|e| e.created_at).max()?;
    let total_words: usize = entries
        .iter()
        .map(|e| e.content.split_whitespace().count())
        .sum();
    let average_words_per_entry =
        (total_words as f64 / total_entries as f64 * 100.0).round() / 100.0;

    let mut counts: HashMap<&str, i64> = HashMap::new();
    let mut seen_order: Vec<&str> = Vec::new();
    for entry in entries {
        if let Some(mood) = entry.mood_label() {
            let count = counts.entry(mood).or_insert(0);
            if *count == 0 {
                seen_order.push(mood);
            }
            *count += 1;
        }
    }
    let mut most_common_mood: Option<(&str, i64)> = None;
    for mood in seen_order {
        let count = counts[mood];
        if most_common_mood.map_or(true, |(_, best)| count > best) {
            most_common_mood = Some((mood, count));
        }
    }

    Some(JournalStats {
        total_entries,
        first_entry,
        latest_entry,
        total_words,
        average_words_per_entry,
        most_common_mood: most_common_mood.map(|(m, _)| m.to_string()),
    })
}

/// Zero-filled digest of the 7 calendar dates `today-6 ..= today`, ascending.
/// Always exactly 7 keys; entries outside the window are ignored. Entries
/// without a mood count under the literal "unspecified" bucket.
pub fn seven_day_digest(
    entries: &[JournalEntry],
    today: NaiveDate,
) -> BTreeMap<NaiveDate, DaySummary> {
    let window_start = today - Duration::days(6);
    let mut digest: BTreeMap<NaiveDate, DaySummary> = (0..7)
        .map(|i| (window_start + Duration::days(i), DaySummary::default()))
        .collect();

    for entry in entries {
        if let Some(day) = digest.get_mut(&entry.created_at.date_naive()) {
            day.count += 1;
            let mood = entry.mood_label().unwrap_or("unspecified");
            *day.moods.entry(mood.to_string()).or_insert(0) += 1;
        }
    }

    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn entry_at(date: (i32, u32, u32), hour: u32, mood: Option<&str>, content: &str) -> JournalEntry {
        let (y, m, d) = date;
        let created_at = Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap();
        JournalEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "entry".into(),
            content: content.into(),
            mood: mood.map(str::to_string),
            reflection: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mood_summary_counts_per_label() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, Some("calm"), "a"),
            entry_at((2024, 1, 1), 20, Some("anxious"), "b"),
            entry_at((2024, 1, 2), 9, Some("calm"), "c"),
        ];
        let summary = mood_summary(&entries, None, None);
        assert_eq!(summary.get("calm"), Some(&2));
        assert_eq!(summary.get("anxious"), Some(&1));
        assert_eq!(summary.values().sum::<i64>(), 3);
    }

    #[test]
    fn test_mood_summary_excludes_unset_moods() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, Some("calm"), "a"),
            entry_at((2024, 1, 1), 9, None, "b"),
            entry_at((2024, 1, 1), 10, Some(""), "c"),
        ];
        let summary = mood_summary(&entries, None, None);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.values().sum::<i64>(), 1);
    }

    #[test]
    fn test_mood_summary_respects_inclusive_bounds() {
        let entries = vec![
            entry_at((2024, 1, 1), 12, Some("calm"), "a"),
            entry_at((2024, 1, 5), 12, Some("calm"), "b"),
            entry_at((2024, 1, 9), 12, Some("calm"), "c"),
        ];
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let summary = mood_summary(&entries, Some(start), Some(end));
        assert_eq!(summary.get("calm"), Some(&2));
    }

    #[test]
    fn test_mood_summary_empty_input_is_empty_map() {
        assert!(mood_summary(&[], None, None).is_empty());
    }

    #[test]
    fn test_mood_trends_ascending_without_duplicate_dates() {
        let entries = vec![
            entry_at((2024, 1, 3), 8, Some("tired"), "a"),
            entry_at((2024, 1, 1), 8, Some("calm"), "b"),
            entry_at((2024, 1, 1), 20, Some("calm"), "c"),
            entry_at((2024, 1, 1), 22, Some("anxious"), "d"),
        ];
        let trends = mood_trends(&entries);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].date, day(2024, 1, 1));
        assert_eq!(trends[1].date, day(2024, 1, 3));
        assert_eq!(trends[0].moods.get("calm"), Some(&2));
        assert_eq!(trends[0].moods.get("anxious"), Some(&1));
    }

    #[test]
    fn test_mood_trends_omits_moodless_days() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 2), 8, Some("calm"), "b"),
        ];
        let trends = mood_trends(&entries);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].date, day(2024, 1, 2));
    }

    #[test]
    fn test_streaks_consecutive_days() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 2), 8, None, "b"),
            entry_at((2024, 1, 3), 8, None, "c"),
        ];
        let result = streaks(&entries, day(2024, 1, 3));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 3,
                longest_streak: 3
            }
        );
    }

    #[test]
    fn test_streaks_gap_resets_run() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 5), 8, None, "b"),
        ];
        let result = streaks(&entries, day(2024, 1, 5));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 1,
                longest_streak: 1
            }
        );
    }

    #[test]
    fn test_streaks_stale_run_is_not_current() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 2), 8, None, "b"),
        ];
        let result = streaks(&entries, day(2024, 1, 10));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 0,
                longest_streak: 2
            }
        );
    }

    #[test]
    fn test_streaks_yesterday_still_counts_as_current() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 2), 8, None, "b"),
        ];
        let result = streaks(&entries, day(2024, 1, 3));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 2,
                longest_streak: 2
            }
        );
    }

    #[test]
    fn test_streaks_ignore_input_order_and_same_day_multiples() {
        let entries = vec![
            entry_at((2024, 1, 3), 8, None, "a"),
            entry_at((2024, 1, 1), 23, None, "b"),
            entry_at((2024, 1, 2), 8, None, "c"),
            entry_at((2024, 1, 2), 21, None, "d"),
            entry_at((2024, 1, 1), 6, None, "e"),
        ];
        let result = streaks(&entries, day(2024, 1, 3));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 3,
                longest_streak: 3
            }
        );
    }

    #[test]
    fn test_streaks_single_day() {
        let entries = vec![entry_at((2024, 1, 1), 8, None, "a")];
        let fresh = streaks(&entries, day(2024, 1, 1));
        assert_eq!(
            fresh,
            StreakSummary {
                current_streak: 1,
                longest_streak: 1
            }
        );
        let stale = streaks(&entries, day(2024, 2, 1));
        assert_eq!(
            stale,
            StreakSummary {
                current_streak: 0,
                longest_streak: 1
            }
        );
    }

    #[test]
    fn test_streaks_longest_survives_later_gap() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a"),
            entry_at((2024, 1, 2), 8, None, "b"),
            entry_at((2024, 1, 3), 8, None, "c"),
            entry_at((2024, 1, 10), 8, None, "d"),
            entry_at((2024, 1, 11), 8, None, "e"),
        ];
        let result = streaks(&entries, day(2024, 1, 11));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 2,
                longest_streak: 3
            }
        );
    }

    #[test]
    fn test_streaks_empty() {
        let result = streaks(&[], day(2024, 1, 1));
        assert_eq!(
            result,
            StreakSummary {
                current_streak: 0,
                longest_streak: 0
            }
        );
    }

    #[test]
    fn test_stats_empty_is_none() {
        assert_eq!(stats(&[]), None);
    }

    #[test]
    fn test_stats_word_counts_and_bounds() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, Some("calm"), "one two three"),
            entry_at((2024, 1, 4), 8, None, "four  five"),
        ];
        let s = stats(&entries).unwrap();
        assert_eq!(s.total_entries, 2);
        assert_eq!(s.total_words, 5);
        assert_eq!(s.average_words_per_entry, 2.5);
        assert_eq!(s.first_entry, entries[0].created_at);
        assert_eq!(s.latest_entry, entries[1].created_at);
        assert_eq!(s.most_common_mood.as_deref(), Some("calm"));
    }

    #[test]
    fn test_stats_average_rounds_to_two_decimals() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, None, "a b"),
            entry_at((2024, 1, 2), 8, None, "c d"),
            entry_at((2024, 1, 3), 8, None, "e"),
        ];
        // 5 words over 3 entries
        let s = stats(&entries).unwrap();
        assert_eq!(s.average_words_per_entry, 1.67);
    }

    #[test]
    fn test_stats_mood_tie_keeps_first_encountered() {
        let entries = vec![
            entry_at((2024, 1, 1), 8, Some("tired"), "a"),
            entry_at((2024, 1, 2), 8, Some("happy"), "b"),
            entry_at((2024, 1, 3), 8, Some("happy"), "c"),
            entry_at((2024, 1, 4), 8, Some("tired"), "d"),
        ];
        let s = stats(&entries).unwrap();
        assert_eq!(s.most_common_mood.as_deref(), Some("tired"));
    }

    #[test]
    fn test_stats_no_moods_gives_none_label() {
        let entries = vec![entry_at((2024, 1, 1), 8, None, "a")];
        let s = stats(&entries).unwrap();
        assert_eq!(s.most_common_mood, None);
    }

    #[test]
    fn test_seven_day_digest_always_seven_keys() {
        let today = day(2024, 3, 10);
        let digest = seven_day_digest(&[], today);
        assert_eq!(digest.len(), 7);
        let keys: Vec<NaiveDate> = digest.keys().copied().collect();
        assert_eq!(keys[0], day(2024, 3, 4));
        assert_eq!(keys[6], today);
        assert!(digest.values().all(|d| d.count == 0 && d.moods.is_empty()));
    }

    #[test]
    fn test_seven_day_digest_buckets_and_unspecified() {
        let today = day(2024, 3, 10);
        let entries = vec![
            entry_at((2024, 3, 10), 8, Some("calm"), "a"),
            entry_at((2024, 3, 10), 20, None, "b"),
            entry_at((2024, 3, 4), 8, Some("calm"), "c"),
        ];
        let digest = seven_day_digest(&entries, today);
        let today_summary = &digest[&today];
        assert_eq!(today_summary.count, 2);
        assert_eq!(today_summary.moods.get("calm"), Some(&1));
        assert_eq!(today_summary.moods.get("unspecified"), Some(&1));
        assert_eq!(digest[&day(2024, 3, 4)].count, 1);
    }

    #[test]
    fn test_seven_day_digest_excludes_out_of_window_entries() {
        let today = day(2024, 3, 10);
        let entries = vec![
            entry_at((2024, 3, 3), 8, Some("calm"), "too old"),
            entry_at((2024, 3, 11), 8, Some("calm"), "future"),
        ];
        let digest = seven_day_digest(&entries, today);
        assert_eq!(digest.len(), 7);
        assert!(digest.values().all(|d| d.count == 0));
    }
}
