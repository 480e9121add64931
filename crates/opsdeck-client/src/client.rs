use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use opsdeck_core::analysis::{CompletionAnalysis, QualityAnalysis};
use opsdeck_core::document::KnowledgeDocument;
use opsdeck_core::jd::{JdAnalysis, JdIntake, SavedJd};
use opsdeck_core::profile::OrganizationProfile;
use opsdeck_core::sop::{ReviewSuggestion, SopDocument, SopGenerateRequest, SopVersion};

use crate::config::Config;
use crate::error::ApiError;
use crate::stream::AnalysisStream;
use crate::Result;

/// When the throttle emits this header with a zero, the response is a rate
/// limit regardless of status code.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

// ─── ApiClient ────────────────────────────────────────────────────────────

/// Async client for the dashboard API. All endpoint semantics (AI calls,
/// storage, PDF rendering) live server-side; this client only speaks the
/// JSON contracts.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_token, Duration::from_secs(120))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(
            config.base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn with_timeout(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    // ─── Knowledge base ───────────────────────────────────────────────────

    /// GET /api/organization-knowledge-base
    pub async fn knowledge_base(&self) -> Result<KnowledgeBaseSnapshot> {
        let response = self
            .request(Method::GET, "/api/organization-knowledge-base")
            .send()
            .await?;
        let env: KnowledgeBaseEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(KnowledgeBaseSnapshot {
            profile: env.organization_profile,
            completion: env.completion_analysis,
            quality: env.quality_analysis,
            documents: env.documents.unwrap_or_default(),
        })
    }

    /// POST /api/organization-knowledge-base
    pub async fn save_profile(&self, profile: &OrganizationProfile) -> Result<SaveOutcome> {
        let response = self
            .request(Method::POST, "/api/organization-knowledge-base")
            .json(profile)
            .send()
            .await?;
        let env: KnowledgeBaseEnvelope = parse_json(response).await?;
        require_success(env.success, env.message.clone())?;
        Ok(SaveOutcome {
            profile: env.organization_profile,
            completion: env.completion_analysis,
            message: env.message,
        })
    }

    /// GET /api/organization-knowledge-base/analyze-quality
    ///
    /// `None` simply means no analysis has been run yet.
    pub async fn quality_analysis(&self) -> Result<Option<QualityAnalysis>> {
        let response = self
            .request(Method::GET, "/api/organization-knowledge-base/analyze-quality")
            .send()
            .await?;
        let env: QualityEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(env.quality_analysis)
    }

    /// POST /api/organization-knowledge-base/analyze-quality
    ///
    /// May return a cached analysis (`cached: true`) for up to 24 hours.
    pub async fn run_quality_analysis(&self) -> Result<QualityOutcome> {
        let response = self
            .request(Method::POST, "/api/organization-knowledge-base/analyze-quality")
            .send()
            .await?;
        let env: QualityEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(QualityOutcome {
            quality: env.quality_analysis,
            cached: env.cached.unwrap_or(false),
        })
    }

    /// GET /api/organization-knowledge-base/documents
    pub async fn documents(&self) -> Result<Vec<KnowledgeDocument>> {
        let response = self
            .request(Method::GET, "/api/organization-knowledge-base/documents")
            .send()
            .await?;
        let env: DocumentsEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(env.documents)
    }

    // ─── Role builder ─────────────────────────────────────────────────────

    /// POST /api/jd/analyze — newline-delimited JSON event stream.
    ///
    /// Validation failures never reach the network.
    pub async fn analyze_role(&self, intake: &JdIntake) -> Result<AnalysisStream> {
        if let Some(reason) = intake.validation_error() {
            return Err(ApiError::Validation(reason.to_string()));
        }
        let response = self
            .request(Method::POST, "/api/jd/analyze")
            .json(intake)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(AnalysisStream::from_response(response))
    }

    /// POST /api/jd/save
    pub async fn save_jd(&self, title: &str, analysis: &JdAnalysis) -> Result<String> {
        let body = serde_json::json!({ "title": title, "analysis": analysis });
        let response = self
            .request(Method::POST, "/api/jd/save")
            .json(&body)
            .send()
            .await?;
        let env: SaveJdEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(env.id.unwrap_or_default())
    }

    /// GET /api/jd/saved — an empty library is an empty list, not an error.
    pub async fn saved_jds(&self) -> Result<Vec<SavedJd>> {
        let response = self.request(Method::GET, "/api/jd/saved").send().await?;
        match parse_json::<SavedJdsEnvelope>(response).await {
            Ok(env) => {
                require_success(env.success, env.message)?;
                Ok(env.jds)
            }
            Err(ApiError::Server { status: 404, .. }) => Ok(vec![]),
            Err(e) => Err(e),
        }
    }

    /// POST /api/jd/download — binary PDF.
    pub async fn download_jd(&self, id: &str) -> Result<PdfDownload> {
        self.download("/api/jd/download", id).await
    }

    // ─── SOP builder ──────────────────────────────────────────────────────

    /// POST /api/sop/generate
    pub async fn generate_sop(&self, request: &SopGenerateRequest) -> Result<SopDocument> {
        if let Some(reason) = request.validation_error() {
            return Err(ApiError::Validation(reason.to_string()));
        }
        let response = self
            .request(Method::POST, "/api/sop/generate")
            .json(request)
            .send()
            .await?;
        self.sop_from_envelope(response).await
    }

    /// POST /api/sop/update
    pub async fn update_sop(&self, request: &SopUpdateRequest) -> Result<SopDocument> {
        let response = self
            .request(Method::POST, "/api/sop/update")
            .json(request)
            .send()
            .await?;
        self.sop_from_envelope(response).await
    }

    /// GET /api/sop/saved — empty library is an empty list.
    pub async fn saved_sops(&self) -> Result<Vec<SopDocument>> {
        let response = self.request(Method::GET, "/api/sop/saved").send().await?;
        match parse_json::<SavedSopsEnvelope>(response).await {
            Ok(env) => {
                require_success(env.success, env.message)?;
                Ok(env.sops)
            }
            Err(ApiError::Server { status: 404, .. }) => Ok(vec![]),
            Err(e) => Err(e),
        }
    }

    /// GET /api/sop/{id} — also serves individual versions by their id.
    pub async fn sop(&self, id: &str) -> Result<SopDocument> {
        let response = self
            .request(Method::GET, &format!("/api/sop/{id}"))
            .send()
            .await?;
        self.sop_from_envelope(response).await
    }

    /// GET /api/sop/{id}/versions
    pub async fn sop_versions(&self, id: &str) -> Result<Vec<SopVersion>> {
        let response = self
            .request(Method::GET, &format!("/api/sop/{id}/versions"))
            .send()
            .await?;
        let env: VersionsEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        Ok(env.versions)
    }

    /// POST /api/sop/{id}/restore
    ///
    /// Creates a new current-version pointer server-side. Callers must
    /// re-fetch the document and version list afterwards; nothing here
    /// mutates local state.
    pub async fn restore_sop(&self, id: &str, version_id: &str) -> Result<()> {
        let body = serde_json::json!({ "versionId": version_id });
        let response = self
            .request(Method::POST, &format!("/api/sop/{id}/restore"))
            .json(&body)
            .send()
            .await?;
        let env: AckEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)
    }

    /// POST /api/sop/download — binary PDF.
    pub async fn download_sop(&self, id: &str) -> Result<PdfDownload> {
        self.download("/api/sop/download", id).await
    }

    /// POST /api/sop/review
    pub async fn review_sop(&self, id: &str) -> Result<Vec<ReviewSuggestion>> {
        let body = serde_json::json!({ "id": id });
        let response = self
            .request(Method::POST, "/api/sop/review")
            .json(&body)
            .send()
            .await?;
        let env: ReviewEnvelope = parse_json(response).await?;
        Ok(env.suggestions)
    }

    // ─── Internals ────────────────────────────────────────────────────────

    async fn sop_from_envelope(&self, response: Response) -> Result<SopDocument> {
        let env: SopEnvelope = parse_json(response).await?;
        require_success(env.success, env.message)?;
        env.sop.ok_or_else(|| {
            ApiError::Server {
                status: 200,
                message: "response carried no SOP document".to_string(),
                user_message: None,
            }
        })
    }

    async fn download(&self, path: &str, id: &str) -> Result<PdfDownload> {
        let body = serde_json::json!({ "id": id });
        let response = self.request(Method::POST, path).json(&body).send().await?;
        let response = check(response).await?;
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition);
        let bytes = response.bytes().await?;
        Ok(PdfDownload { file_name, bytes })
    }
}

// ─── Response triage ──────────────────────────────────────────────────────

/// Rate limiting is checked before any generic error parsing.
fn rate_limit_signature(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || headers
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false)
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
    user_message: Option<String>,
    message: Option<String>,
}

/// Triage a raw response: rate limit, then generic error, then pass through.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();

    if rate_limit_signature(status, response.headers()) {
        let retry_after = retry_after_seconds(response.headers());
        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .user_message
            .or(body.error)
            .or(body.message)
            .unwrap_or_else(|| "Too many requests. Try again shortly.".to_string());
        return Err(ApiError::RateLimited {
            message,
            retry_after_seconds: retry_after,
        });
    }

    if !status.is_success() {
        let ErrorBody {
            error,
            details,
            user_message,
            message,
        } = response.json().await.unwrap_or_default();
        let message = error
            .or(message)
            .or(details)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
            user_message,
        });
    }

    Ok(response)
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check(response).await?;
    Ok(response.json::<T>().await?)
}

/// Map a `success: false` envelope to a business error.
fn require_success(success: bool, message: Option<String>) -> Result<()> {
    if success {
        return Ok(());
    }
    Err(ApiError::Server {
        status: 200,
        message: message.unwrap_or_else(|| "the server reported a failure".to_string()),
        user_message: None,
    })
}

/// Pull the filename out of a `Content-Disposition` header value.
fn filename_from_content_disposition(value: &str) -> Option<String> {
    let idx = value.to_ascii_lowercase().find("filename=")?;
    let raw = value[idx + "filename=".len()..]
        .split(';')
        .next()?
        .trim()
        .trim_matches('"');
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

// ─── Result shapes ────────────────────────────────────────────────────────

/// Everything the initial dashboard fetch returns.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseSnapshot {
    pub profile: Option<OrganizationProfile>,
    pub completion: Option<CompletionAnalysis>,
    pub quality: Option<QualityAnalysis>,
    pub documents: Vec<KnowledgeDocument>,
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub profile: Option<OrganizationProfile>,
    pub completion: Option<CompletionAnalysis>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QualityOutcome {
    pub quality: Option<QualityAnalysis>,
    pub cached: bool,
}

#[derive(Debug, Clone)]
pub struct PdfDownload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SopUpdateRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

// ─── Wire envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeBaseEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    organization_profile: Option<OrganizationProfile>,
    #[serde(default)]
    completion_analysis: Option<CompletionAnalysis>,
    #[serde(default)]
    quality_analysis: Option<QualityAnalysis>,
    #[serde(default)]
    documents: Option<Vec<KnowledgeDocument>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QualityEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    quality_analysis: Option<QualityAnalysis>,
    #[serde(default)]
    cached: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentsEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    documents: Vec<KnowledgeDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveJdEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedJdsEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    jds: Vec<SavedJd>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SopEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sop: Option<SopDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSopsEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sops: Vec<SopDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionsEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    versions: Vec<SopVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AckEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewEnvelope {
    #[serde(default)]
    suggestions: Vec<ReviewSuggestion>,
}

// ─── Tests ────────────────────────────────────────────────────────────────
