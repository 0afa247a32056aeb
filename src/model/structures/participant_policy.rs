use strum_macros::{Display, EnumIter, EnumString};

/// What recording a match does with participants that have no rating record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ParticipantPolicy {
    /// Create them with the configured defaults.
    #[default]
    AutoCreate,
    RejectUnknown
}
