use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time-to-ready estimate
// ---------------------------------------------------------------------------

/// Rough minutes needed to fill in the given missing fields.
///
/// Two minutes per field with a floor of two. A display and ranking
/// heuristic only, not a commitment.
pub fn estimate_time_to_ready(missing_fields: &[String]) -> u32 {
    (missing_fields.len() as u32 * 2).max(2)
}

// ---------------------------------------------------------------------------
// CompletionTier
// ---------------------------------------------------------------------------

/// Profile maturity band derived from the overall completion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTier {
    Optimized,
    Building,
    GettingStarted,
}

impl CompletionTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => CompletionTier::Optimized,
            50..=79 => CompletionTier::Building,
            _ => CompletionTier::GettingStarted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompletionTier::Optimized => "Optimized",
            CompletionTier::Building => "Building",
            CompletionTier::GettingStarted => "Getting Started",
        }
    }
}

// ---------------------------------------------------------------------------
// QualityBand
// ---------------------------------------------------------------------------

/// Banded label for a 0-100 quality score. Each band is inclusive on its
/// lower bound: 80 is excellent, 60 is good, 40 is basic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Excellent,
    Good,
    Basic,
    Insufficient,
}

impl QualityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => QualityBand::Excellent,
            60..=79 => QualityBand::Good,
            40..=59 => QualityBand::Basic,
            _ => QualityBand::Insufficient,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityBand::Excellent => "excellent",
            QualityBand::Good => "good",
            QualityBand::Basic => "basic",
            QualityBand::Insufficient => "insufficient",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
