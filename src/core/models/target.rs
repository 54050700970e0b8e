use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::GearlogError;

/// Kind of tracked entity a log entry points at.
///
/// Selects the collection the restore engine operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Equipment,
    Defect,
}

impl TargetType {
    pub const ALL: [TargetType; 2] = [TargetType::Equipment, TargetType::Defect];

    /// Name as persisted in log entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Equipment => "equipment",
            TargetType::Defect => "defect",
        }
    }

    /// Name of the entity collection backing this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            TargetType::Equipment => "equipment",
            TargetType::Defect => "defects",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = GearlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Ok(TargetType::Equipment),
            "defect" | "defects" => Ok(TargetType::Defect),
            _ => Err(GearlogError::UnknownTargetType {
                value: s.to_string(),
            }),
        }
    }
}
