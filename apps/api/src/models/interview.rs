use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One question/answer pair inside an attempt, with the evaluator's
/// feedback and sub-scores (0-10). Sub-scores may be absent when the
/// evaluator returned nothing for a question; they count as 0 in the
/// recomputed display average.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: String,
    /// Why this question is asked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Transcribed answer. Empty when no speech was captured.
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub grammar_score: Option<f64>,
}

/// One completed run through an interview's questions. Stored embedded in
/// the interview row; insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    #[serde(default)]
    pub overall_feedback: String,
    /// Evaluator-supplied holistic score (0-10). Distinct from the
    /// per-answer display average, which is recomputed from the records;
    /// the two may legitimately disagree.
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub per_answer: Vec<AnswerRecord>,
    pub created_at: DateTime<Utc>,
}

/// A job-role practice session definition owned by one user. The attempts
/// column is an append-only JSONB log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub job_title: String,
    pub topics: String,
    pub experience_years: f64,
    pub attempts: Json<Vec<Attempt>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_wire_names_are_camel_case() {
        let attempt = Attempt {
            overall_feedback: "solid".to_string(),
            overall_score: Some(7.0),
            per_answer: vec![AnswerRecord {
                question: "What is ownership?".to_string(),
                description: None,
                user_answer: "A move semantics model".to_string(),
                feedback: "correct".to_string(),
                relevance_score: Some(8.0),
                grammar_score: Some(9.0),
            }],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&attempt).unwrap();
        assert!(json.get("overallFeedback").is_some());
        assert!(json.get("overallScore").is_some());
        assert!(json.get("createdAt").is_some());
        let record = &json["perAnswer"][0];
        assert!(record.get("userAnswer").is_some());
        assert!(record.get("relevanceScore").is_some());
        assert!(record.get("grammarScore").is_some());
    }

    #[test]
    fn test_attempt_tolerates_missing_overall_score() {
        let attempt: Attempt = serde_json::from_str(
            r#"{"overallFeedback": "no score given", "createdAt": "2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(attempt.overall_score, None);
        assert!(attempt.per_answer.is_empty());
    }

    #[test]
    fn test_answer_record_round_trip() {
        let record = AnswerRecord {
            question: "Explain lifetimes".to_string(),
            description: Some("probes borrow-checker depth".to_string()),
            user_answer: String::new(),
            feedback: "no answer captured".to_string(),
            relevance_score: Some(0.0),
            grammar_score: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AnswerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
