//! `opsdeck-client` — typed HTTP client for the opsdeck dashboard API.
//!
//! The server owns all heavy machinery (AI generation, storage, PDF
//! rendering); this crate speaks its JSON contracts and nothing more.
//!
//! # Architecture
//!
//! ```text
//! Config            ← base URL, token, timeout (YAML, resolved per env/cwd/home)
//!     │
//!     ▼
//! ApiClient         ← reqwest; response triage: rate limit → error body → OK
//!     │
//!     ├── JSON endpoints (knowledge base, quality, documents, JD, SOP)
//!     │
//!     ├── AnalysisStream ← NDJSON body decoded into typed events
//!     │       implements futures::Stream<Item = Result<AnalysisEvent>>
//!     │
//!     └── SopSession  ← version list + selection + restore, server-authoritative
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use opsdeck_client::{collect_analysis, ApiClient};
//! use opsdeck_core::jd::JdIntake;
//!
//! let client = ApiClient::new("http://localhost:3000", None)?;
//! let intake = JdIntake { role_title: "Ops Manager".into(), ..Default::default() };
//! let stream = client.analyze_role(&intake).await?;
//! let analysis = collect_analysis(stream, |stage| eprintln!("… {stage}")).await?;
//! println!("{}", analysis.preview.title);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod ndjson;
pub mod sop;
pub mod stream;

pub use client::{
    ApiClient, KnowledgeBaseSnapshot, PdfDownload, QualityOutcome, SaveOutcome, SopUpdateRequest,
};
pub use config::Config;
pub use error::ApiError;
pub use ndjson::AnalysisEvent;
pub use sop::SopSession;
pub use stream::{collect_analysis, AnalysisStream};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ApiError>;
