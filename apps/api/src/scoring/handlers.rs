//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::scoring::breakdown::Breakdown;
use crate::scoring::pipeline::score_resume;
use crate::scoring::registry::{registry, Aspect};
use crate::scoring::schema::RatingScale;
use crate::scoring::store::structured_record;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AspectInfo {
    pub name: Aspect,
    pub rubric: &'static str,
    pub scales: &'static [RatingScale],
    pub output_schema: &'static Value,
}

/// GET /api/v1/scoring/aspects
///
/// Lists the registry: every aspect with its rubric, rating scales and output schema.
pub async fn handle_list_aspects() -> Json<Vec<AspectInfo>> {
    Json(
        registry()
            .iter()
            .map(|d| AspectInfo {
                name: d.aspect,
                rubric: d.rubric,
                scales: d.scales,
                output_schema: d.output_schema(),
            })
            .collect(),
    )
}

/// POST /api/v1/scoring/preview
///
/// Scores a record supplied in the body. Nothing is persisted.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Json<Breakdown>, AppError> {
    let breakdown = run_scoring(&state, &record).await?;
    Ok(Json(breakdown))
}

/// POST /api/v1/resumes/:id/score
///
/// Scores the stored structured resume and replaces its feedback. Feedback is
/// written only after the whole run finished inside the run timeout.
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Breakdown>, AppError> {
    let row = state.store.load_resume(resume_id).await?;
    let record = structured_record(&row)?;

    info!("Scoring resume {resume_id}");
    let breakdown = run_scoring(&state, &record).await?;

    state.store.save_feedback(resume_id, &breakdown).await?;

    Ok(Json(breakdown))
}

/// GET /api/v1/resumes/:id/feedback
///
/// Returns the last stored breakdown for a resume.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let row = state.store.load_resume(resume_id).await?;
    row.resume_feedback
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} has not been scored")))
}

/// Runs the pipeline under the configured run timeout. On expiry the run is
/// dropped, which aborts in-flight model calls.
async fn run_scoring(state: &AppState, record: &ResumeRecord) -> Result<Breakdown, AppError> {
    let run_timeout = state.config.run_timeout;
    tokio::time::timeout(
        run_timeout,
        score_resume(record, state.invoker.clone(), Utc::now()),
    )
    .await
    .map_err(|_| {
        AppError::Timeout(format!(
            "Scoring did not finish within {}s",
            run_timeout.as_secs()
        ))
    })
}
