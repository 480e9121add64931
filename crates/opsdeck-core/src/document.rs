use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExtractionStatus
// ---------------------------------------------------------------------------

/// Pipeline state of an uploaded knowledge document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ExtractionStatus {
    /// True once the pipeline will not change this document again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExtractionStatus::Completed | ExtractionStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionStatus::Pending => "PENDING",
            ExtractionStatus::Processing => "PROCESSING",
            ExtractionStatus::Completed => "COMPLETED",
            ExtractionStatus::Failed => "FAILED",
        }
    }
}

// ---------------------------------------------------------------------------
// KnowledgeDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    pub extraction_status: ExtractionStatus,
    #[serde(default)]
    pub extraction_error: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
