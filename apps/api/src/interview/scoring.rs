use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::interview::{AnswerRecord, Interview};

/// Mean of `(relevance + grammar) / 2` across an attempt's answer records,
/// rounded to one decimal for display. Absent sub-scores count as 0.
/// An attempt with no records scores 0.0, not NaN.
pub fn attempt_average(per_answer: &[AnswerRecord]) -> f64 {
    if per_answer.is_empty() {
        return 0.0;
    }
    let sum: f64 = per_answer
        .iter()
        .map(|r| (r.relevance_score.unwrap_or(0.0) + r.grammar_score.unwrap_or(0.0)) / 2.0)
        .sum();
    round1(sum / per_answer.len() as f64)
}

/// One chart point: a short date label and the attempt's overall score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub score: f64,
}

/// Chronological score history across every attempt sharing a job title,
/// plus the arithmetic mean of the included scores.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub job_title: String,
    pub points: Vec<TrendPoint>,
    pub average_score: f64,
}

/// Builds the score history for one job title over a user's interviews.
/// Title matching is exact, case-sensitive string equality. Attempts
/// without an overall score are dropped; the survivors are sorted
/// ascending by creation time. Returns `None` when nothing scored
/// remains, so callers can distinguish "no data" from an empty chart.
pub fn trend_series(interviews: &[Interview], job_title: &str) -> Option<TrendSeries> {
    let mut scored: Vec<(DateTime<Utc>, f64)> = interviews
        .iter()
        .filter(|i| i.job_title == job_title)
        .flat_map(|i| i.attempts.iter())
        .filter_map(|a| a.overall_score.map(|score| (a.created_at, score)))
        .collect();

    if scored.is_empty() {
        return None;
    }
    scored.sort_by_key(|(created_at, _)| *created_at);

    // Mean over the raw overall scores, not the recomputed per-answer
    // averages, with no recency weighting.
    let mean = scored.iter().map(|(_, score)| score).sum::<f64>() / scored.len() as f64;
    let points = scored
        .into_iter()
        .map(|(created_at, score)| TrendPoint {
            label: date_label(created_at),
            score,
        })
        .collect();

    Some(TrendSeries {
        job_title: job_title.to_string(),
        points,
        average_score: round1(mean),
    })
}

/// Short day-month label for chart axes, e.g. 2025-01-01 -> "1 Jan".
fn date_label(at: DateTime<Utc>) -> String {
    at.format("%-d %b").to_string()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::types::Json;
    use uuid::Uuid;

    use crate::models::interview::Attempt;

    fn record(relevance: f64, grammar: f64) -> AnswerRecord {
        AnswerRecord {
            question: "q".to_string(),
            description: None,
            user_answer: "a".to_string(),
            feedback: String::new(),
            relevance_score: Some(relevance),
            grammar_score: Some(grammar),
        }
    }

    fn attempt(score: Option<f64>, created_at: DateTime<Utc>) -> Attempt {
        Attempt {
            overall_feedback: String::new(),
            overall_score: score,
            per_answer: vec![],
            created_at,
        }
    }

    fn interview(job_title: &str, attempts: Vec<Attempt>) -> Interview {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        Interview {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            job_title: job_title.to_string(),
            topics: "general".to_string(),
            experience_years: 2.0,
            attempts: Json(attempts),
            created_at: now,
            updated_at: now,
        }
    }

    fn day(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_attempt_scores_zero() {
        assert_eq!(attempt_average(&[]), 0.0);
    }

    #[test]
    fn test_attempt_average_known_values() {
        // (8+6)/2 = 7, (10+10)/2 = 10 -> mean 8.5
        let records = vec![record(8.0, 6.0), record(10.0, 10.0)];
        assert_eq!(attempt_average(&records), 8.5);
    }

    #[test]
    fn test_attempt_average_is_order_independent() {
        let forward = vec![record(2.0, 4.0), record(6.0, 8.0), record(10.0, 0.0)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(attempt_average(&forward), attempt_average(&reversed));
    }

    #[test]
    fn test_attempt_average_treats_missing_scores_as_zero() {
        let mut r = record(8.0, 6.0);
        r.grammar_score = None;
        // (8+0)/2 = 4
        assert_eq!(attempt_average(&[r]), 4.0);
    }

    #[test]
    fn test_attempt_average_rounds_to_one_decimal() {
        // (5+6)/2 = 5.5, (7+7)/2 = 7, (8+9)/2 = 8.5 -> mean 7.0
        let records = vec![record(5.0, 6.0), record(7.0, 7.0), record(8.0, 9.0)];
        assert_eq!(attempt_average(&records), 7.0);
        // (3+4)/2 = 3.5, (4+4)/2 = 4 -> mean 3.75 -> 3.8
        let records = vec![record(3.0, 4.0), record(4.0, 4.0)];
        assert_eq!(attempt_average(&records), 3.8);
    }

    #[test]
    fn test_trend_example_two_attempts() {
        let interviews = vec![interview(
            "Backend Engineer",
            vec![
                attempt(Some(6.0), day(1, 1)),
                attempt(Some(8.0), day(2, 1)),
            ],
        )];

        let series = trend_series(&interviews, "Backend Engineer").unwrap();
        assert_eq!(
            series.points,
            vec![
                TrendPoint { label: "1 Jan".to_string(), score: 6.0 },
                TrendPoint { label: "1 Feb".to_string(), score: 8.0 },
            ]
        );
        assert_eq!(series.average_score, 7.0);
    }

    #[test]
    fn test_trend_sorts_by_creation_time() {
        let interviews = vec![interview(
            "Backend Engineer",
            vec![
                attempt(Some(8.0), day(2, 1)),
                attempt(Some(6.0), day(1, 1)),
                attempt(Some(9.0), day(2, 15)),
            ],
        )];

        let series = trend_series(&interviews, "Backend Engineer").unwrap();
        let scores: Vec<f64> = series.points.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![6.0, 8.0, 9.0]);
    }

    #[test]
    fn test_trend_flattens_across_interviews_and_drops_unscored() {
        let interviews = vec![
            interview(
                "Backend Engineer",
                vec![attempt(Some(6.0), day(1, 1)), attempt(None, day(1, 5))],
            ),
            interview("Backend Engineer", vec![attempt(Some(8.0), day(2, 1))]),
            interview("Data Scientist", vec![attempt(Some(2.0), day(1, 2))]),
        ];

        let series = trend_series(&interviews, "Backend Engineer").unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.average_score, 7.0);
    }

    #[test]
    fn test_trend_title_match_is_case_sensitive() {
        let interviews = vec![interview(
            "Backend Engineer",
            vec![attempt(Some(6.0), day(1, 1))],
        )];
        assert!(trend_series(&interviews, "backend engineer").is_none());
    }

    #[test]
    fn test_trend_without_scored_attempts_is_no_data() {
        let interviews = vec![interview(
            "Backend Engineer",
            vec![attempt(None, day(1, 1))],
        )];
        assert!(trend_series(&interviews, "Backend Engineer").is_none());
        assert!(trend_series(&[], "Backend Engineer").is_none());
    }
}
