use strum_macros::{Display, EnumIter, EnumString};

/// Granularity of the inactivity clock used when growing rating deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DecayResolution {
    Days,
    #[default]
    Weeks
}

impl DecayResolution {
    /// Converts a span of whole days into elapsed decay units.
    pub fn units(self, days: i64) -> i64 {
        match self {
            DecayResolution::Days => days,
            DecayResolution::Weeks => days.div_euclid(crate::model::constants::DAYS_PER_WEEK)
        }
    }
}
