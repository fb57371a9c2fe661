pub mod assessment;
pub mod coach;
pub mod exercises;
pub mod extract;
pub mod health;
pub mod trades;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors::dashboard_cors, rate_limit};
use crate::AppState;

/// Largest accepted trade screenshot upload.
const SCREENSHOT_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let assessment_api = Router::new()
        .route("/api/assessment", get(assessment::get_status))
        .route("/api/assessment/start", post(assessment::start))
        .route("/api/assessment/pause", post(assessment::pause))
        .route("/api/assessment/resume", post(assessment::resume))
        .route("/api/assessment/restart", post(assessment::restart))
        .route("/api/assessment/question", get(assessment::current_question))
        .route(
            "/api/assessment/answer",
            post(assessment::answer).put(assessment::select_answer),
        )
        .route(
            "/api/assessment/ranking/reorder",
            post(assessment::reorder_ranking),
        )
        .route("/api/assessment/results", get(assessment::results));

    let journal_api = Router::new()
        .route(
            "/api/trades/history",
            get(trades::list_history)
                .post(trades::record_trade)
                .delete(trades::clear_history),
        )
        .route("/api/trades/history/:id", delete(trades::delete_trade))
        .route("/api/exercises", get(exercises::list_exercises))
        .route("/api/exercises/:id/start", post(exercises::start_exercise))
        .route(
            "/api/exercises/progress",
            get(exercises::exercise_status).delete(exercises::reset_exercise),
        )
        .route("/api/exercises/progress/next", post(exercises::next_step));

    let coach_api = Router::new()
        .route("/api/coach/message", post(coach::send_message))
        .route("/api/coach/emotion", post(coach::analyze_emotion))
        .route("/api/coach/plan", post(coach::generate_plan))
        .route("/api/courses/:id/enroll", post(coach::enroll_course))
        .route("/api/courses/:id/progress", get(coach::course_progress))
        .route(
            "/api/trades/screenshot",
            post(coach::analyze_screenshot).layer(DefaultBodyLimit::max(SCREENSHOT_BODY_LIMIT)),
        )
        .layer(middleware::from_fn_with_state(
            state.coach_limiter.clone(),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(assessment_api)
        .merge(journal_api)
        .merge(coach_api)
        .layer(dashboard_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
