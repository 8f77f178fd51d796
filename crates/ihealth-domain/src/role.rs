//! User role domain type.

use serde::{Deserialize, Serialize};

/// User role. Drives every authorization decision.
///
/// Wire and database format: lowercase string (`"patient"`, `"doctor"`,
/// `"assistant"`, `"admin"`). Fixed at registration, never changed by any flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
    Assistant,
    Admin,
}

impl Role {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str(v: &str) -> Option<Self> {
        match v {
            "patient" => Some(Self::Patient),
            "doctor" => Some(Self::Doctor),
            "assistant" => Some(Self::Assistant),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// The stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Assistant => "assistant",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn is_doctor(self) -> bool {
        matches!(self, Self::Doctor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
