use crate::cli::ServeArgs;
use crate::demo::sample_dataset;
use crate::infra::{seed_stores, AppState};
use crate::routes::with_ranking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidate_ranking::config::AppConfig;
use candidate_ranking::error::AppError;
use candidate_ranking::ranking::{CandidateRankingService, Dataset, RankingError};
use candidate_ranking::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = match args.seed.take() {
        Some(path) => Dataset::from_path(path)?,
        None => sample_dataset()?,
    };
    let (jobs, applications) = seed_stores(&dataset).map_err(RankingError::from)?;
    info!(
        jobs = jobs.len(),
        applications = applications.len(),
        "seeded in-memory job and application stores"
    );

    let ranking_service = Arc::new(CandidateRankingService::new(
        Arc::new(jobs),
        Arc::new(applications),
        config.ranking.clone(),
    ));

    let app = with_ranking_routes(ranking_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        workers = config.ranking.worker_threads,
        tie_break = %config.ranking.tie_break,
        "candidate ranking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
