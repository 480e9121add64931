use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SopContent
// ---------------------------------------------------------------------------

/// SOP body content. Newer documents carry a `{markdown, html}` object;
/// documents saved before the rendering split are a bare markdown string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SopContent {
    Rich {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        markdown: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
    Legacy(String),
}

impl SopContent {
    pub fn markdown(&self) -> Option<&str> {
        match self {
            SopContent::Rich { markdown, .. } => markdown.as_deref(),
            SopContent::Legacy(s) => Some(s),
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            SopContent::Rich { html, .. } => html.as_deref(),
            SopContent::Legacy(_) => None,
        }
    }

    /// True when there is nothing renderable at all.
    pub fn is_unavailable(&self) -> bool {
        self.markdown().map(str::is_empty).unwrap_or(true) && self.html().is_none()
    }
}

impl Default for SopContent {
    fn default() -> Self {
        SopContent::Rich {
            markdown: None,
            html: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SopDocument / SopVersion
// ---------------------------------------------------------------------------

/// A generated SOP as the server returns it: a root identity plus the
/// content of whichever version is current.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SopDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub version_number: Option<u32>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: SopContent,
}

/// One entry in an SOP's linear version chain. The server keeps exactly one
/// `is_current_version` flag true per chain; the client only ever reflects
/// that flag, it never flips it locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SopVersion {
    pub id: String,
    pub version_number: u32,
    #[serde(default)]
    pub is_current_version: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Option<SopContent>,
}

// ---------------------------------------------------------------------------
// Reconciliation helpers
// ---------------------------------------------------------------------------

/// Stand-in version list entry when the versions endpoint fails or returns
/// nothing (pre-versioning documents). Built from the already-loaded
/// document so there is always at least one selectable version.
pub fn fallback_version(doc: &SopDocument) -> SopVersion {
    SopVersion {
        id: doc.id.clone(),
        version_number: doc.version_number.unwrap_or(1),
        is_current_version: true,
        created_by: doc.created_by.clone(),
        created_at: doc.created_at,
        version_created_at: doc.updated_at.or(doc.created_at),
        content: Some(doc.content.clone()),
    }
}

/// The version the server flags as current. Falls back to the highest
/// version number when the listing carries no flag at all.
pub fn current_version(versions: &[SopVersion]) -> Option<&SopVersion> {
    versions
        .iter()
        .find(|v| v.is_current_version)
        .or_else(|| versions.iter().max_by_key(|v| v.version_number))
}

pub fn find_version<'a>(versions: &'a [SopVersion], id: &str) -> Option<&'a SopVersion> {
    versions.iter().find(|v| v.id == id)
}

// ---------------------------------------------------------------------------
// SopGenerateRequest
// ---------------------------------------------------------------------------

/// What the user fills in before generating an SOP.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SopGenerateRequest {
    pub business_name: String,
    pub title: Option<String>,
    pub tasks: Vec<String>,
    pub tone: Option<String>,
    pub notes: Option<String>,
}

impl SopGenerateRequest {
    /// Checked before the request is ever sent; returns the reason the
    /// request is not sendable, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.business_name.trim().is_empty() {
            return Some("a business name is required");
        }
        if !self.tasks.iter().any(|t| !t.trim().is_empty()) {
            return Some("at least one task is required");
        }
        None
    }
}

// ---------------------------------------------------------------------------
// ReviewSuggestion
// ---------------------------------------------------------------------------

/// One inline edit proposed by the SOP review endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: String,
    pub original: String,
    pub suggested: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
