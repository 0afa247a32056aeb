use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type MatchId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub name: String,
    /// 1-based finishing position; tied participants share a value
    pub rank: u32
}

impl Placement {
    pub fn new(name: impl Into<String>, rank: u32) -> Placement {
        Placement { name: name.into(), rank }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    /// Unknown until stored
    #[serde(default)]
    pub id: Option<MatchId>,
    pub date: NaiveDate,
    pub placements: Vec<Placement>
}

impl MatchEntry {
    pub fn new(date: NaiveDate, placements: Vec<Placement>) -> MatchEntry {
        MatchEntry {
            id: None,
            date,
            placements
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.placements.iter().any(|p| p.name == name)
    }

    /// The match as it would have been without `name`.
    ///
    /// Remaining placements are re-ranked so that ranks stay within
    /// `1..=N`. Returns `None` when fewer than two participants remain.
    pub fn without_participant(&self, name: &str) -> Option<MatchEntry> {
        let remaining: Vec<&Placement> = self.placements.iter().filter(|p| p.name != name).collect();

        if remaining.len() < 2 {
            return None;
        }

        let ranks = competition_ranks(&remaining.iter().map(|p| p.rank).collect::<Vec<u32>>());
        let placements = remaining
            .iter()
            .zip(ranks)
            .map(|(p, rank)| Placement::new(p.name.clone(), rank))
            .collect();

        Some(MatchEntry {
            id: self.id,
            date: self.date,
            placements
        })
    }
}

/// Standard competition ranking ("1224"): each rank becomes one plus the
/// number of entries that finished strictly ahead of it.
pub fn competition_ranks(ranks: &[u32]) -> Vec<u32> {
    ranks
        .iter()
        .map(|rank| 1 + ranks.iter().filter(|other| *other < rank).count() as u32)
        .collect()
}
