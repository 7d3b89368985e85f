use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown proficiency level: {raw:?}")]
pub struct ParseLevelError {
    raw: String,
}

//
// ─── CEFR LEVEL ───────────────────────────────────────────────────────────────
//

/// Six-point proficiency scale, ordered from beginner to proficient.
///
/// The derived ordering is the pedagogical one (`A1 < A2 < ... < C2`), and
/// `CefrLevel::ALL` iterates in that same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Every level in pedagogical order.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Canonical level code, e.g. `"B1"`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Zero-based position in `CefrLevel::ALL`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CefrLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        CefrLevel::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError {
                raw: s.to_string(),
            })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
