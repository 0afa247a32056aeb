use strum_macros::{Display, EnumIter, EnumString};

/// When the per-match rating change cap is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CapScope {
    #[default]
    EveryMatch,
    /// Only a participant's first ever rated match is capped.
    FirstMatchOnly
}
