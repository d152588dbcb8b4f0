use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::ai_client::{Evaluation, Question};
use crate::errors::AppError;
use crate::state::AppState;

// The proxy routes keep the external service's snake_case wire names so
// responses pass through unchanged.

#[derive(Deserialize)]
pub struct GenerateQuestionsBody {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub experience_year: Option<f64>,
}

#[derive(Serialize)]
pub struct QuestionsBody {
    pub questions: Vec<Question>,
}

/// POST /ai/generate_questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionsBody>,
) -> Result<Json<QuestionsBody>, AppError> {
    let job_title = req.job_title.trim();
    let topics = req.topics.trim();
    if job_title.is_empty() || topics.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let questions = state
        .ai
        .generate_questions(job_title, topics, req.experience_year.unwrap_or(0.0))
        .await?;
    Ok(Json(QuestionsBody { questions }))
}

#[derive(Deserialize)]
pub struct EvaluateAnswersBody {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// POST /ai/evaluate_answers
/// Mismatched arrays are rejected here rather than round-tripped to the
/// service.
pub async fn handle_evaluate_answers(
    State(state): State<AppState>,
    Json(req): Json<EvaluateAnswersBody>,
) -> Result<Json<Evaluation>, AppError> {
    if req.questions.is_empty() || req.questions.len() != req.answers.len() {
        return Err(AppError::Validation(
            "questions and answers must be non-empty arrays of the same length".to_string(),
        ));
    }

    let evaluation = state.ai.evaluate_answers(&req.questions, &req.answers).await?;
    Ok(Json(evaluation))
}
