use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tool keys as they appear in `toolImpact` / `toolReadiness` maps.
pub const BUSINESS_BRAIN: &str = "businessBrain";
pub const ROLE_BUILDER: &str = "roleBuilder";
pub const SOP_BUILDER: &str = "sopBuilder";

/// Quality analyses older than this are considered stale and worth re-running.
pub const QUALITY_CACHE_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionAnalysis
// ---------------------------------------------------------------------------

/// Field-completion scoring, recomputed server-side on every profile
/// fetch/save. Tier percentages are taken verbatim from this payload and
/// never recomputed locally, so the dashboard and server cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionAnalysis {
    pub overall_score: u8,
    pub tier1_essential: FieldTier,
    pub tier2_context: FieldTier,
    pub tier3_intelligence: FieldTier,
    #[serde(default)]
    pub tool_readiness: HashMap<String, ToolReadiness>,
    #[serde(default)]
    pub recommendations: Vec<CompletionRecommendation>,
}

impl CompletionAnalysis {
    pub fn tool(&self, key: &str) -> Option<&ToolReadiness> {
        self.tool_readiness.get(key)
    }
}

/// One of the three fixed field groups (essential, context, intelligence).
/// `complete` is true iff `filled_fields == total_fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldTier {
    pub percentage: u8,
    pub complete: bool,
    #[serde(default)]
    pub filled_fields: u32,
    #[serde(default)]
    pub total_fields: u32,
    #[serde(default)]
    pub fields: Vec<FieldStatus>,
}

impl FieldTier {
    /// Names of the fields in this tier that are still empty.
    pub fn missing_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !f.filled)
            .map(|f| f.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatus {
    pub name: String,
    pub label: String,
    pub filled: bool,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub affects_tools: Vec<String>,
}

/// Per-tool readiness derived from field completion alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolReadiness {
    pub ready: bool,
    pub score: u8,
    #[serde(default)]
    pub quality_label: Option<String>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    /// Combined completion+quality gate, present once a quality analysis has
    /// run. Distinct from the plain field-completion `ready` flag.
    #[serde(default)]
    pub quality_readiness: Option<QualityReadiness>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityReadiness {
    pub ready: bool,
    pub score: u8,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecommendation {
    pub priority: Priority,
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub benefit: Option<String>,
}

// ---------------------------------------------------------------------------
// QualityAnalysis
// ---------------------------------------------------------------------------

/// Content-quality scoring produced by the analyze-quality endpoint. Served
/// from a server-side cache for up to 24 hours; absence simply means no
/// analysis has been run yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityAnalysis {
    pub overall_score: u8,
    #[serde(default)]
    pub field_quality: HashMap<String, FieldQuality>,
    #[serde(default)]
    pub cross_field_coherence: Option<u8>,
    #[serde(default)]
    pub tool_impact: HashMap<String, ToolImpact>,
    #[serde(default)]
    pub top_recommendations: Vec<QualityRecommendation>,
    pub analyzed_at: DateTime<Utc>,
}

impl QualityAnalysis {
    pub fn tool(&self, key: &str) -> Option<&ToolImpact> {
        self.tool_impact.get(key)
    }

    /// True once the cached analysis has aged past the server's cache window.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.analyzed_at > Duration::hours(QUALITY_CACHE_HOURS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldQuality {
    pub score: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolImpact {
    pub quality_score: u8,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub enhancers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityRecommendation {
    pub priority: Priority,
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
    #[serde(default)]
    pub impact: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
