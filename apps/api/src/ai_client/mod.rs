/// AI service client — the single point of entry for calls to the external
/// question-generation and answer-evaluation service.
///
/// Calls are single-shot: a failure surfaces to the caller as one visible
/// error, never a silent retry.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod handlers;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// One generated interview question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub question: String,
    /// Why this question is asked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateQuestionsRequest<'a> {
    job_title: &'a str,
    topics: &'a str,
    experience_year: f64,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
struct EvaluateAnswersRequest<'a> {
    questions: &'a [Question],
    answers: &'a [String],
}

/// Per-question verdict from the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerAnswerEvaluation {
    pub question_index: usize,
    pub feedback: String,
    pub relevance_score: f64,
    pub grammar_score: f64,
}

/// The evaluator's verdict for one full attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub overall_feedback: String,
    pub overall_score: f64,
    pub per_answer: Vec<PerAnswerEvaluation>,
}

/// The single AI service client shared across handlers.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Asks the service for interview questions for a role.
    pub async fn generate_questions(
        &self,
        job_title: &str,
        topics: &str,
        experience_year: f64,
    ) -> Result<Vec<Question>, AiError> {
        let response = self
            .client
            .post(format!("{}/generate_questions", self.base_url))
            .json(&GenerateQuestionsRequest {
                job_title,
                topics,
                experience_year,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: QuestionsResponse = response.json().await?;
        debug!("AI service returned {} questions", body.questions.len());
        Ok(body.questions)
    }

    /// Submits question/answer pairs for evaluation. The caller is
    /// responsible for sending arrays of matching length.
    pub async fn evaluate_answers(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> Result<Evaluation, AiError> {
        let response = self
            .client
            .post(format!("{}/evaluate_answers", self.base_url))
            .json(&EvaluateAnswersRequest { questions, answers })
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_matches_service_contract() {
        let payload = r#"{
            "overall_feedback": "Good depth, work on fluency.",
            "overall_score": 7,
            "per_answer": [
                {"question_index": 0, "feedback": "solid", "relevance_score": 8, "grammar_score": 6}
            ]
        }"#;
        let evaluation: Evaluation = serde_json::from_str(payload).unwrap();
        assert_eq!(evaluation.overall_score, 7.0);
        assert_eq!(evaluation.per_answer[0].question_index, 0);
        assert_eq!(evaluation.per_answer[0].relevance_score, 8.0);
    }

    #[test]
    fn test_questions_parse_with_and_without_description() {
        let payload = r#"{"questions": [
            {"question": "Explain indexing", "description": "checks storage depth"},
            {"question": "What is a deadlock?"}
        ]}"#;
        let body: QuestionsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(body.questions.len(), 2);
        assert!(body.questions[1].description.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = AiClient::new("http://localhost:5000/".to_string());
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
