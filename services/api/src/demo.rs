use crate::infra::seed_stores;
use crate::rank::render_table;
use candidate_ranking::error::AppError;
use candidate_ranking::ranking::{
    CandidateRankingService, Dataset, RankingConfig, RankingError, TieBreak,
};
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;

/// Seed data bundled with the binary: three jobs covering every requirement kind, an
/// unrecognized kind, a job without requirements and a couple of broken profiles.
pub(crate) const SAMPLE_DATASET: &str = include_str!("../data/sample_dataset.json");

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only rank this job from the sample dataset
    #[arg(long)]
    pub(crate) job_id: Option<i64>,
    /// Tie-break to apply (candidate_id or input_order)
    #[arg(long)]
    pub(crate) tie_break: Option<TieBreak>,
    /// Hide the per-requirement score breakdown
    #[arg(long)]
    pub(crate) summary_only: bool,
}

pub(crate) fn sample_dataset() -> Result<Dataset, AppError> {
    Ok(Dataset::from_reader(SAMPLE_DATASET.as_bytes())?)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_demo(&mut out, args)
}

pub(crate) fn write_demo<W: Write>(out: &mut W, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        job_id,
        tie_break,
        summary_only,
    } = args;

    let dataset = sample_dataset()?;
    let (jobs, applications) = seed_stores(&dataset).map_err(RankingError::from)?;
    let config = RankingConfig {
        tie_break: tie_break.unwrap_or_default(),
        ..RankingConfig::sequential()
    };
    let service = CandidateRankingService::new(Arc::new(jobs), Arc::new(applications), config);

    writeln!(out, "Candidate ranking demo (tie-break: {})", service.config().tie_break)?;
    for job in &dataset.jobs {
        if job_id.is_some_and(|wanted| wanted != job.id.0) {
            continue;
        }

        writeln!(out, "\nJob {}: {}", job.id, job.title)?;
        match service.rank_candidates(job.id) {
            Ok(outcome) => render_table(out, &outcome, !summary_only)?,
            Err(err) => writeln!(out, "  Ranking unavailable: {err}")?,
        }
    }

    Ok(())
}
