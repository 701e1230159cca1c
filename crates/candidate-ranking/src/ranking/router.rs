use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::AppError;

use super::domain::JobId;
use super::repository::{ApplicationSource, RequirementSource};
use super::service::{CandidateRankingService, RankingError, RankingOutcome};

/// Router builder exposing the ranking endpoints.
pub fn ranking_router<J, A>(service: Arc<CandidateRankingService<J, A>>) -> Router
where
    J: RequirementSource + 'static,
    A: ApplicationSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/:job_id/applications/ranked",
            get(ranked_handler::<J, A>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/ranked/report",
            get(report_handler::<J, A>),
        )
        .with_state(service)
}

pub(crate) async fn ranked_handler<J, A>(
    State(service): State<Arc<CandidateRankingService<J, A>>>,
    Path(job_id): Path<i64>,
) -> Response
where
    J: RequirementSource + 'static,
    A: ApplicationSource + 'static,
{
    match run_ranking(service, JobId(job_id)).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.into_results())).into_response(),
        Err(failure) => failure.into_response(),
    }
}

pub(crate) async fn report_handler<J, A>(
    State(service): State<Arc<CandidateRankingService<J, A>>>,
    Path(job_id): Path<i64>,
) -> Response
where
    J: RequirementSource + 'static,
    A: ApplicationSource + 'static,
{
    match run_ranking(service, JobId(job_id)).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.report())).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// Runs the ranking on the blocking pool under the configured deadline.
pub(crate) async fn run_ranking<J, A>(
    service: Arc<CandidateRankingService<J, A>>,
    job_id: JobId,
) -> Result<RankingOutcome, RankingFailure>
where
    J: RequirementSource + 'static,
    A: ApplicationSource + 'static,
{
    let deadline = service.config().deadline();
    let task = tokio::task::spawn_blocking(move || service.rank_candidates(job_id));

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(result)) => result.map_err(RankingFailure::Ranking),
        Ok(Err(join_error)) => {
            error!(%job_id, error = %join_error, "ranking task failed");
            Err(RankingFailure::Worker(join_error.to_string()))
        }
        Err(_) => {
            warn!(%job_id, deadline_ms = deadline.as_millis() as u64, "ranking exceeded deadline");
            Err(RankingFailure::DeadlineExceeded(deadline))
        }
    }
}

#[derive(Debug)]
pub(crate) enum RankingFailure {
    Ranking(RankingError),
    DeadlineExceeded(Duration),
    Worker(String),
}

impl IntoResponse for RankingFailure {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RankingFailure::Ranking(err) => return AppError::from(err).into_response(),
            RankingFailure::DeadlineExceeded(deadline) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("ranking exceeded {} ms deadline", deadline.as_millis()),
            ),
            RankingFailure::Worker(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("ranking task failed: {message}"),
            ),
        };

        let payload = json!({ "error": message });
        (status, axum::Json(payload)).into_response()
    }
}
