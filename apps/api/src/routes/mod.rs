pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::ai_client::handlers as ai;
use crate::auth::handlers as auth;
use crate::interview::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/user/register", post(auth::handle_register))
        .route("/user/login", post(auth::handle_login))
        .route("/user/logout", post(auth::handle_logout))
        .route("/user/session", get(auth::handle_session))
        // Interview API
        .route(
            "/interviews/create/:user_id",
            post(interviews::handle_create),
        )
        .route("/interviews/:user_id", get(interviews::handle_list))
        .route(
            "/interviews/analysis/:id",
            get(interviews::handle_analysis),
        )
        .route("/interviews/update/:id", put(interviews::handle_update))
        .route(
            "/interviews/delete/:user_id/:interview_id",
            delete(interviews::handle_delete),
        )
        .route(
            "/interviews/addAttempt/:id",
            post(interviews::handle_add_attempt),
        )
        .route(
            "/interviews/trend/:user_id/:interview_id",
            get(interviews::handle_trend),
        )
        // AI proxy API
        .route("/ai/generate_questions", post(ai::handle_generate_questions))
        .route("/ai/evaluate_answers", post(ai::handle_evaluate_answers))
        .with_state(state)
}
