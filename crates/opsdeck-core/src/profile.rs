use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrganizationProfile
// ---------------------------------------------------------------------------

/// The structured profile of a business, one per organization.
///
/// Every descriptive field is optional: the server accepts partial saves and
/// derives completion scoring from whatever has been filled in so far. Field
/// names on the wire are camelCase (the dashboard API's JSON dialect).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationProfile {
    // Identity
    pub business_name: Option<String>,
    pub industry: Option<String>,
    pub sub_industry: Option<String>,
    pub business_model: Option<String>,
    pub revenue_band: Option<String>,
    pub team_size: Option<String>,
    pub founded_year: Option<String>,
    pub locations: Option<String>,

    // Voice and positioning
    pub brand_voice: Option<String>,
    pub tone_notes: Option<String>,
    pub target_audience: Option<String>,
    pub value_proposition: Option<String>,
    pub differentiators: Option<String>,

    // Operations
    pub core_offerings: Option<String>,
    pub key_processes: Option<String>,
    pub tool_stack: Option<String>,
    pub compliance_flags: Option<String>,
    pub certifications: Option<String>,
    pub service_area: Option<String>,
    pub regulated_industry: Option<bool>,

    // Intelligence
    pub strategic_goals: Option<String>,
    pub growth_stage: Option<String>,
    pub market_position: Option<String>,
    pub customer_pain_points: Option<String>,
    pub success_metrics: Option<String>,
    pub partnerships: Option<String>,
    pub seasonal_patterns: Option<String>,
    pub pricing_model: Option<String>,
    pub team_structure: Option<String>,
    pub hiring_plans: Option<String>,
    pub culture_notes: Option<String>,

    // Audit trail
    pub last_edited_by: Option<String>,
    pub contributors_count: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    // Server-computed scoring. `required_fields_complete` is true only when
    // every essential-tier field is non-empty; the client takes it as given.
    pub completeness: Option<u8>,
    pub completeness_breakdown: Option<serde_json::Value>,
    pub required_fields_complete: bool,
}

impl OrganizationProfile {
    /// True when nothing descriptive has been filled in yet.
    pub fn is_blank(&self) -> bool {
        self.business_name.is_none()
            && self.industry.is_none()
            && self.core_offerings.is_none()
            && self.target_audience.is_none()
            && self.strategic_goals.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
