use strum_macros::{Display, EnumIter, EnumString};

/// How repeated matches on one calendar day are rated.
///
/// `FirstGameFullRestLightweight` runs the full update for a participant's
/// first match of the day and only nudges the rating for later ones, leaving
/// deviation and volatility untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SameDayMode {
    FullEveryGame,
    #[default]
    FirstGameFullRestLightweight
}
