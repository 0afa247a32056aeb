use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use crate::model::{
    constants::{ALL_TIED_SCORE, PLACEMENT_CURVE_EXPONENT},
    structures::outcome_scoring::OutcomeScoring
};

/// Pairwise scores for one match.
///
/// `score(a, b)` is participant `a`'s result against participant `b` in
/// `[0, 1]`, indexed by position in the placement list. Ranks are expected
/// to be validated already (at least two entries, each within `1..=N`).
#[derive(Debug, Clone)]
pub struct OutcomeMatrix {
    scores: Vec<Vec<f64>>,
    tie_fraction: f64
}

impl OutcomeMatrix {
    pub fn new(ranks: &[u32], scoring: OutcomeScoring) -> OutcomeMatrix {
        let n = ranks.len();
        let tie_counts: HashMap<u32, usize> = ranks.iter().copied().counts();
        let all_tied = tie_counts.len() == 1;

        let scores = (0..n)
            .map(|a| {
                (0..n)
                    .map(|b| {
                        if a == b || all_tied {
                            return ALL_TIED_SCORE;
                        }

                        match scoring {
                            OutcomeScoring::Pairwise => pairwise_score(ranks[a], ranks[b], n, &tie_counts),
                            OutcomeScoring::PlacementCurve => placement_curve_score(ranks[a], ranks)
                        }
                    })
                    .collect()
            })
            .collect();

        let tied = ranks.iter().filter(|rank| tie_counts[*rank] > 1).count();

        OutcomeMatrix {
            scores,
            tie_fraction: tied as f64 / n as f64
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn score(&self, a: usize, b: usize) -> f64 {
        self.scores[a][b]
    }

    /// Every `(opponent index, score)` pair for participant `a`.
    pub fn opponents_of(&self, a: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.scores[a]
            .iter()
            .enumerate()
            .filter(move |(b, _)| *b != a)
            .map(|(b, score)| (b, *score))
    }

    /// Share of the field involved in any tie.
    pub fn tie_fraction(&self) -> f64 {
        self.tie_fraction
    }
}

/// Participant indices grouped by shared rank, best rank first.
pub fn tie_groups(ranks: &[u32]) -> BTreeMap<u32, Vec<usize>> {
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, rank) in ranks.iter().enumerate() {
        groups.entry(*rank).or_default().push(idx);
    }

    groups
}

fn pairwise_score(rank_a: u32, rank_b: u32, n: usize, tie_counts: &HashMap<u32, usize>) -> f64 {
    if rank_a < rank_b {
        1.0
    } else if rank_a > rank_b {
        0.0
    } else {
        // Higher tie groups earn a larger share; a two-player tie is 0.5.
        (n as f64 - rank_a as f64) / (n as f64 - 1.0) / tie_counts[&rank_a] as f64
    }
}

fn placement_curve_score(rank: u32, ranks: &[u32]) -> f64 {
    let (min, max) = ranks
        .iter()
        .minmax()
        .into_option()
        .map(|(min, max)| (*min as f64, *max as f64))
        .unwrap_or((rank as f64, rank as f64));

    if max == min {
        return ALL_TIED_SCORE;
    }

    let normalized = (rank as f64 - min) / (max - min);
    1.0 - normalized.powf(PLACEMENT_CURVE_EXPONENT)
}
