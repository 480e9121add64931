use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JdIntake
// ---------------------------------------------------------------------------

/// What the user fills in before asking for a role analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct JdIntake {
    pub role_title: String,
    pub department: Option<String>,
    pub seniority: Option<String>,
    pub key_tasks: Vec<String>,
    pub must_haves: Vec<String>,
    pub notes: Option<String>,
}

impl JdIntake {
    /// Fields that must be present before the intake is worth sending.
    /// Returns the reason it is not, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.role_title.trim().is_empty() {
            return Some("a role title is required");
        }
        None
    }
}

// ---------------------------------------------------------------------------
// JdAnalysis
// ---------------------------------------------------------------------------

/// One generated job-description recommendation package.
///
/// `preview` is always materialized: when the server omits it, an
/// empty-shaped default is fabricated so rendering never dereferences a
/// missing object. `full_package` is passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JdAnalysis {
    #[serde(default)]
    pub preview: JdPreview,
    #[serde(default)]
    pub full_package: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct JdPreview {
    pub title: String,
    pub summary: Option<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub nice_to_haves: Vec<String>,
}

// ---------------------------------------------------------------------------
// SavedJd
// ---------------------------------------------------------------------------

/// Listing entry for a previously saved job description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedJd {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub analysis: Option<JdAnalysis>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
