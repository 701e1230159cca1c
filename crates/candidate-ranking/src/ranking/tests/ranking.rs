use super::common::*;
use crate::ranking::domain::{CandidateId, ScoredCandidate};
use crate::ranking::ranker::{rank, unranked};
use crate::ranking::TieBreak;

fn scored(id: i64, name: &str, average_score: f64) -> ScoredCandidate {
    ScoredCandidate {
        candidate: candidate(id, name, "Le"),
        average_score,
        breakdown: Vec::new(),
    }
}

fn ids(results: &[crate::ranking::RankingResult]) -> Vec<i64> {
    results.iter().map(|result| result.candidate_id.0).collect()
}

#[test]
fn rank_orders_best_first_with_dense_ranks() {
    let candidates = vec![
        scored(3, "Chi", 4.5),
        scored(1, "An", 9.0),
        scored(2, "Binh", 6.25),
    ];

    let results = rank(&candidates, TieBreak::CandidateId);

    assert_eq!(ids(&results), vec![1, 2, 3]);
    let ranks: Vec<u32> = results.iter().map(|result| result.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(results[0].candidate_name, "An Le");
    assert_close(results[1].average_score, 6.25);
}

#[test]
fn ties_fall_back_to_candidate_id_by_default() {
    let candidates = vec![scored(9, "Dung", 7.0), scored(4, "Em", 7.0), scored(6, "Giang", 8.0)];

    let results = rank(&candidates, TieBreak::default());

    assert_eq!(ids(&results), vec![6, 4, 9]);
    assert_eq!(results[1].rank, 2);
    assert_eq!(results[2].rank, 3);
}

#[test]
fn input_order_tie_break_keeps_source_order() {
    let candidates = vec![scored(9, "Dung", 7.0), scored(4, "Em", 7.0), scored(6, "Giang", 8.0)];

    let results = rank(&candidates, TieBreak::InputOrder);

    assert_eq!(ids(&results), vec![6, 9, 4]);
}

#[test]
fn unranked_keeps_input_order_with_zero_scores() {
    let b = candidate(2, "Binh", "Tran");
    let a = candidate(1, "An", "Nguyen");

    let results = unranked([&b, &a]);

    assert_eq!(ids(&results), vec![2, 1]);
    assert!(results
        .iter()
        .all(|result| result.rank == 0 && result.average_score == 0.0));
    assert_eq!(results[0].candidate_id, CandidateId(2));
}

#[test]
fn rank_of_nothing_is_empty() {
    assert!(rank(&[], TieBreak::CandidateId).is_empty());
}

#[test]
fn tie_break_parses_config_spellings() {
    assert_eq!("candidate_id".parse::<TieBreak>(), Ok(TieBreak::CandidateId));
    assert_eq!("Input-Order".parse::<TieBreak>(), Ok(TieBreak::InputOrder));
    assert_eq!("stable".parse::<TieBreak>(), Ok(TieBreak::InputOrder));
    assert!("alphabetical".parse::<TieBreak>().is_err());
    assert_eq!(TieBreak::InputOrder.to_string(), "input_order");
}
