//! Body parts recorded by the tracking networks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracklab_core::{Error, Result};

/// One tracked body part; each has its own network and input directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPartKind {
    Paw,
    Pupil,
    Nostril,
    Tongue,
}

impl BodyPartKind {
    pub const ALL: [BodyPartKind; 4] = [
        BodyPartKind::Paw,
        BodyPartKind::Pupil,
        BodyPartKind::Nostril,
        BodyPartKind::Tongue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPartKind::Paw => "paw",
            BodyPartKind::Pupil => "pupil",
            BodyPartKind::Nostril => "nostril",
            BodyPartKind::Tongue => "tongue",
        }
    }
}

impl fmt::Display for BodyPartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BodyPartKind::ALL
            .into_iter()
            .find(|part| part.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown body part '{}'", s)))
    }
}
