use strum_macros::{Display, EnumIter, EnumString};

/// Which rule turns placements into per-opponent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OutcomeScoring {
    /// 1 / 0 against strictly worse / better finishers, weighted share against tied ones.
    #[default]
    Pairwise,
    /// A single score per placement, `1 - normalized^0.7`, used against every opponent.
    PlacementCurve
}
