use crate::infra::seed_stores;
use candidate_ranking::config::AppConfig;
use candidate_ranking::error::AppError;
use candidate_ranking::ranking::{
    CandidateId, CandidateRankingService, Dataset, JobId, RankingError, RankingOutcome,
    ScoredCandidate, TieBreak,
};
use clap::{Args, ValueEnum};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned columns for terminals
    #[default]
    Table,
    /// The full ranking report as pretty-printed JSON
    Json,
    /// One row per ranked candidate
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Seed dataset (JSON) holding jobs and their applications
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Job whose applicants should be ranked
    #[arg(long)]
    pub(crate) job_id: i64,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Override RANKING_TIE_BREAK (candidate_id or input_order)
    #[arg(long)]
    pub(crate) tie_break: Option<TieBreak>,
    /// Print the per-requirement scores under each candidate (table output only)
    #[arg(long)]
    pub(crate) breakdown: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        input,
        job_id,
        format,
        tie_break,
        breakdown,
    } = args;

    let mut ranking = AppConfig::load()?.ranking;
    if let Some(tie_break) = tie_break {
        ranking.tie_break = tie_break;
    }

    let dataset = Dataset::from_path(&input)?;
    let (jobs, applications) = seed_stores(&dataset).map_err(RankingError::from)?;
    let service = CandidateRankingService::new(Arc::new(jobs), Arc::new(applications), ranking);

    let outcome = service.rank_candidates(JobId(job_id))?;
    info!(
        job_id,
        ranked = outcome.results.len(),
        skipped = outcome.skipped().count(),
        "ranked dataset job"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &outcome, format, breakdown)?;
    Ok(())
}

pub(crate) fn render<W: Write>(
    out: &mut W,
    outcome: &RankingOutcome,
    format: OutputFormat,
    breakdown: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => render_table(out, outcome, breakdown),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &outcome.report())?;
            writeln!(out)
        }
        OutputFormat::Csv => render_csv(out, outcome),
    }
}

pub(crate) fn render_table<W: Write>(
    out: &mut W,
    outcome: &RankingOutcome,
    breakdown: bool,
) -> io::Result<()> {
    if outcome.results.is_empty() {
        writeln!(out, "Job {}: no applications to rank", outcome.job_id)?;
        return Ok(());
    }

    let scored: HashMap<CandidateId, &ScoredCandidate> = outcome
        .scored()
        .map(|candidate| (candidate.candidate.id, candidate))
        .collect();

    writeln!(out, "{:>4}  {:>6}  {:<8}  Candidate", "Rank", "Score", "Id")?;
    for result in &outcome.results {
        let rank = if result.rank == 0 {
            "-".to_string()
        } else {
            result.rank.to_string()
        };
        writeln!(
            out,
            "{:>4}  {:>6.2}  {:<8}  {}",
            rank, result.average_score, result.candidate_id.0, result.candidate_name
        )?;

        if !breakdown {
            continue;
        }
        let Some(candidate) = scored.get(&result.candidate_id) else {
            continue;
        };
        for criterion in &candidate.breakdown {
            let mandatory = if criterion.mandatory { ", mandatory" } else { "" };
            match &criterion.error {
                Some(reason) => writeln!(
                    out,
                    "{:>16}- {} (weight {}{}): {:.2} [{}]",
                    "", criterion.kind, criterion.weight, mandatory, criterion.score, reason
                )?,
                None => writeln!(
                    out,
                    "{:>16}- {} (weight {}{}): {:.2}",
                    "", criterion.kind, criterion.weight, mandatory, criterion.score
                )?,
            }
        }
    }

    let skipped: Vec<_> = outcome.skipped().collect();
    if !skipped.is_empty() {
        writeln!(out, "\nSkipped ({})", skipped.len())?;
        for candidate in skipped {
            writeln!(
                out,
                "- {} ({}): {}",
                candidate.candidate_name, candidate.candidate_id, candidate.reason
            )?;
        }
    }

    let degraded = outcome.degraded_evaluations();
    if degraded > 0 {
        writeln!(out, "\n{degraded} requirement evaluation(s) fell back to zero")?;
    }
    Ok(())
}

pub(crate) fn render_csv<W: Write>(out: &mut W, outcome: &RankingOutcome) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for result in &outcome.results {
        writer.serialize(result)?;
    }
    writer.flush()
}
