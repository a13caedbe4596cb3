//! Bank identity recognized on a statement.
//!
//! The extraction service returns a free-text bank name; we fold it into a
//! closed set with an ordered list of substring rules. Order matters: a name
//! like "Banco Popular Bank" must land on Popular even though later rules
//! could also match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Banks the extractor knows how to name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BankIdentity {
    #[serde(rename = "Banco Popular")]
    Popular,
    #[serde(rename = "FirstBank")]
    FirstBank,
    #[serde(rename = "Oriental Bank")]
    Oriental,
    #[default]
    #[serde(rename = "Unknown Bank")]
    Unknown,
}

/// (needle, identity) pairs, tested top to bottom. First hit wins.
const NAME_RULES: &[(&str, BankIdentity)] = &[
    ("Popular", BankIdentity::Popular),
    ("FirstBank", BankIdentity::FirstBank),
    ("Oriental", BankIdentity::Oriental),
];

impl BankIdentity {
    /// Map a free-text bank name to a known identity.
    /// Case-sensitive containment; anything unmatched is `Unknown`.
    pub fn from_bank_name(name: &str) -> Self {
        NAME_RULES
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map(|(_, bank)| *bank)
            .unwrap_or(BankIdentity::Unknown)
    }

    /// Human-readable name, also used to synthesize export filenames.
    pub fn display_name(&self) -> &'static str {
        match self {
            BankIdentity::Popular => "Banco Popular",
            BankIdentity::FirstBank => "FirstBank",
            BankIdentity::Oriental => "Oriental Bank",
            BankIdentity::Unknown => "Unknown Bank",
        }
    }

    /// Every name the extraction schema allows the service to answer with.
    pub fn schema_names() -> [&'static str; 4] {
        [
            BankIdentity::Popular.display_name(),
            BankIdentity::FirstBank.display_name(),
            BankIdentity::Oriental.display_name(),
            BankIdentity::Unknown.display_name(),
        ]
    }
}

impl fmt::Display for BankIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
