pub mod analysis;
pub mod document;
pub mod jd;
pub mod loader;
pub mod profile;
pub mod readiness;
pub mod recommend;
pub mod score;
pub mod sop;

pub use analysis::{CompletionAnalysis, Priority, QualityAnalysis, ToolImpact, ToolReadiness};
pub use profile::OrganizationProfile;
pub use score::{estimate_time_to_ready, CompletionTier, QualityBand};
