use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::store as users;
use crate::errors::AppError;
use crate::interview::scoring::{self, TrendSeries};
use crate::interview::store::{self, MetadataPatch};
use crate::models::interview::{AnswerRecord, Attempt, Interview};
use crate::state::AppState;

/// Path ids arrive as raw strings so an unparseable id maps to 400, not
/// to a framework rejection.
fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {what}")))
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn validate_experience_years(years: f64) -> Result<(), AppError> {
    if !years.is_finite() || years < 0.0 {
        return Err(AppError::Validation(
            "experienceYears must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_user_exists(state: &AppState, owner_id: Uuid) -> Result<(), AppError> {
    if users::find_by_id(&state.db, owner_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub experience_years: Option<f64>,
}

/// POST /interviews/create/:userId
pub async fn handle_create(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let owner_id = parse_id(&user_id, "user id")?;

    let job_title = non_empty(req.job_title.as_deref());
    let topics = non_empty(req.topics.as_deref());
    let (Some(job_title), Some(topics), Some(years)) = (job_title, topics, req.experience_years)
    else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };
    validate_experience_years(years)?;

    ensure_user_exists(&state, owner_id).await?;

    let interview = store::insert(&state.db, owner_id, job_title, topics, years).await?;
    info!("Created interview {} for user {owner_id}", interview.id);
    Ok((StatusCode::CREATED, Json(interview)))
}

#[derive(Serialize)]
pub struct InterviewListResponse {
    pub interviews: Vec<Interview>,
}

/// GET /interviews/:userId
pub async fn handle_list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<InterviewListResponse>, AppError> {
    let owner_id = parse_id(&user_id, "user id")?;
    ensure_user_exists(&state, owner_id).await?;

    let interviews = store::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(InterviewListResponse { interviews }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    #[serde(flatten)]
    pub attempt: Attempt,
    /// Display average recomputed from the answer records. May disagree
    /// with the evaluator's `overallScore`; both are reported.
    pub average_score: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub job_title: String,
    pub topics: String,
    pub experience_years: f64,
    pub attempts: Vec<AttemptView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for AnalysisResponse {
    fn from(interview: Interview) -> Self {
        let attempts = interview
            .attempts
            .0
            .into_iter()
            .map(|attempt| AttemptView {
                average_score: scoring::attempt_average(&attempt.per_answer),
                attempt,
            })
            .collect();
        Self {
            id: interview.id,
            owner_id: interview.owner_id,
            job_title: interview.job_title,
            topics: interview.topics,
            experience_years: interview.experience_years,
            attempts,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

/// GET /interviews/analysis/:id
pub async fn handle_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let id = parse_id(&id, "interview id")?;
    let interview = store::fetch(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    Ok(Json(AnalysisResponse::from(interview)))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInterviewRequest {
    pub job_title: Option<String>,
    pub topics: Option<String>,
    pub experience_years: Option<f64>,
}

/// PUT /interviews/update/:id
/// Only fields present and non-empty overwrite the stored metadata.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInterviewRequest>,
) -> Result<Json<Interview>, AppError> {
    let id = parse_id(&id, "interview id")?;

    if let Some(years) = req.experience_years {
        validate_experience_years(years)?;
    }
    let patch = MetadataPatch {
        job_title: non_empty(req.job_title.as_deref()),
        topics: non_empty(req.topics.as_deref()),
        experience_years: req.experience_years,
    };
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let updated = store::update_metadata(&state.db, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /interviews/delete/:userId/:interviewId
/// Tolerates an already-deleted interview; the owner must exist.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path((user_id, interview_id)): Path<(String, String)>,
) -> Result<Json<InterviewListResponse>, AppError> {
    let owner_id = parse_id(&user_id, "user id")?;
    let id = parse_id(&interview_id, "interview id")?;
    ensure_user_exists(&state, owner_id).await?;

    store::delete(&state.db, owner_id, id).await?;
    info!("Deleted interview {id} for user {owner_id}");

    let interviews = store::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(InterviewListResponse { interviews }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttemptRequest {
    #[serde(default)]
    pub overall_feedback: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub per_answer: Vec<AnswerRecord>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendedAttempt {
    /// Zero-based position of the attempt in the interview's log.
    pub position: usize,
    pub attempt: Attempt,
}

/// POST /interviews/addAttempt/:id
pub async fn handle_add_attempt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddAttemptRequest>,
) -> Result<Json<AppendedAttempt>, AppError> {
    let id = parse_id(&id, "interview id")?;

    if req.overall_feedback.is_none() && req.overall_score.is_none() && req.per_answer.is_empty() {
        return Err(AppError::Validation("Attempt payload is required".to_string()));
    }

    let attempt = Attempt {
        overall_feedback: req.overall_feedback.unwrap_or_default(),
        overall_score: req.overall_score,
        per_answer: req.per_answer,
        created_at: req.created_at.unwrap_or_else(Utc::now),
    };

    let updated = store::append_attempt(&state.db, id, &attempt)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    info!(
        "Appended attempt {} to interview {id}",
        updated.attempts.len()
    );

    Ok(Json(AppendedAttempt {
        position: updated.attempts.len() - 1,
        attempt,
    }))
}

/// GET /interviews/trend/:userId/:interviewId
/// Score history across every attempt sharing the interview's job title.
pub async fn handle_trend(
    State(state): State<AppState>,
    Path((user_id, interview_id)): Path<(String, String)>,
) -> Result<Json<TrendSeries>, AppError> {
    let owner_id = parse_id(&user_id, "user id")?;
    let id = parse_id(&interview_id, "interview id")?;
    ensure_user_exists(&state, owner_id).await?;

    let interview = store::fetch(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;

    let interviews = store::list_for_owner(&state.db, owner_id).await?;
    scoring::trend_series(&interviews, &interview.job_title)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No scored attempts found for {}",
                interview.job_title
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_filters_blank_fields() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some(" Backend ")), Some("Backend"));
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid", "user id").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "user id").unwrap(), id);
    }

    #[test]
    fn test_experience_years_must_be_non_negative() {
        assert!(validate_experience_years(0.0).is_ok());
        assert!(validate_experience_years(3.5).is_ok());
        assert!(validate_experience_years(-1.0).is_err());
        assert!(validate_experience_years(f64::NAN).is_err());
    }
}
