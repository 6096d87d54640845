use crate::error::ConfigError;
use std::{fmt, str::FromStr};

/// How the pipeline treats records that do not fit the group snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Unknown members are dropped and unmatched residue is ignored.
    #[default]
    Lenient,
    /// Unknown members, malformed expense shares and residue above one cent fail
    /// the report.
    Strict,
}

impl FromStr for ReferencePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(ConfigError::UnknownReferencePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    pub reference_policy: ReferencePolicy,
}

impl LedgerConfig {
    pub fn strict() -> Self {
        Self {
            reference_policy: ReferencePolicy::Strict,
        }
    }
}
