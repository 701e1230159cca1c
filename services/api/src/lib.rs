mod cli;
mod demo;
mod infra;
mod rank;
mod routes;
mod server;

use candidate_ranking::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
