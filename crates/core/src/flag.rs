//! Single-character `Y`/`N` flags.
//!
//! Project activation and comment tombstones are stored as one-character
//! strings rather than native booleans. [`YesNo`] is the typed view of those
//! columns; it round-trips to the exact same storage text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage text for a set flag.
pub const FLAG_YES: &str = "Y";

/// Storage text for a cleared flag.
pub const FLAG_NO: &str = "N";

/// A two-valued flag persisted as `"Y"` or `"N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl YesNo {
    /// Parse the storage representation. Returns `None` for anything other
    /// than the exact strings `"Y"` and `"N"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            FLAG_YES => Some(Self::Yes),
            FLAG_NO => Some(Self::No),
            _ => None,
        }
    }

    /// The storage representation (`"Y"` or `"N"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => FLAG_YES,
            Self::No => FLAG_NO,
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
