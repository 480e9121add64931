use serde::Serialize;

use crate::analysis::{CompletionAnalysis, QualityAnalysis, BUSINESS_BRAIN};
use crate::score::QualityBand;

/// Business Brain unlocks at this quality score.
pub const BUSINESS_BRAIN_READY_SCORE: u8 = 60;

/// A tool counts as AI-enriched once its quality score reaches this.
pub const AI_ENRICHED_SCORE: u8 = 50;

// ---------------------------------------------------------------------------
// Health display
// ---------------------------------------------------------------------------

/// Headline numbers for the knowledge-base health card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDisplay {
    /// Quality score, when a quality analysis has run.
    pub primary_score: Option<u8>,
    /// Field-completion coverage score.
    pub coverage_score: Option<u8>,
    pub primary_label: &'static str,
}

/// Total over both optional analyses; never panics.
pub fn health_display(
    quality: Option<&QualityAnalysis>,
    completion: Option<&CompletionAnalysis>,
) -> HealthDisplay {
    let primary_score = quality.map(|q| q.overall_score);
    HealthDisplay {
        primary_score,
        coverage_score: completion.map(|c| c.overall_score),
        primary_label: if primary_score.is_some() {
            "Knowledge base quality"
        } else {
            "Not yet analyzed"
        },
    }
}

// ---------------------------------------------------------------------------
// Business Brain readiness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessBrainReadiness {
    pub score: u8,
    pub ready: bool,
    pub band: QualityBand,
    pub message: &'static str,
}

/// Readiness of the Business Brain tool, gated on its quality score.
///
/// The score defaults to 0 when the tool has no quality entry yet; the
/// message distinguishes "never analyzed" from "analyzed but below the bar".
pub fn business_brain_readiness(quality: Option<&QualityAnalysis>) -> BusinessBrainReadiness {
    let impact = quality.and_then(|q| q.tool(BUSINESS_BRAIN));
    let score = impact.map(|t| t.quality_score).unwrap_or(0);
    let ready = score >= BUSINESS_BRAIN_READY_SCORE;

    let message = if impact.is_none() {
        "Run quality check to see readiness"
    } else if ready {
        "Ready for AI conversations"
    } else {
        "Improve profile quality for better AI answers"
    };

    BusinessBrainReadiness {
        score,
        ready,
        band: QualityBand::from_score(score),
        message,
    }
}

/// True when the given tool's answers are materially improved by the
/// quality analysis (score at or above [`AI_ENRICHED_SCORE`]).
pub fn is_enriched_with_ai(quality: Option<&QualityAnalysis>, tool_key: &str) -> bool {
    quality
        .and_then(|q| q.tool(tool_key))
        .map(|t| t.quality_score)
        .unwrap_or(0)
        >= AI_ENRICHED_SCORE
}

// ---------------------------------------------------------------------------
// Next milestone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub message: &'static str,
}

/// The next step toward Business Brain readiness, or `None` once it is
/// ready. The message depends only on whether a quality analysis exists.
pub fn next_milestone(quality: Option<&QualityAnalysis>) -> Option<Milestone> {
    if business_brain_readiness(quality).ready {
        return None;
    }
    let message = if quality.is_some() {
        "Lift Business Brain quality to 60 to unlock AI conversations"
    } else {
        "Run your first quality check to unlock AI conversations"
    };
    Some(Milestone { message })
}

// ---------------------------------------------------------------------------
// Primary CTA
// ---------------------------------------------------------------------------

/// The single call to action the dashboard leads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryCta {
    CompleteEssentials,
    RunQualityCheck,
    ImproveQuality,
    OpenWorkspace,
}

impl PrimaryCta {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryCta::CompleteEssentials => "Complete the essentials",
            PrimaryCta::RunQualityCheck => "Run quality check",
            PrimaryCta::ImproveQuality => "Improve answer quality",
            PrimaryCta::OpenWorkspace => "Open the AI workspace",
        }
    }
}

/// CTA selection, in priority order: finish the essential tier, then get a
/// quality analysis on record, then raise it past the readiness bar.
pub fn primary_cta(
    completion: Option<&CompletionAnalysis>,
    quality: Option<&QualityAnalysis>,
) -> PrimaryCta {
    let essentials_done = completion.map(|c| c.tier1_essential.complete).unwrap_or(false);
    if !essentials_done {
        return PrimaryCta::CompleteEssentials;
    }
    if quality.is_none() {
        return PrimaryCta::RunQualityCheck;
    }
    if !business_brain_readiness(quality).ready {
        return PrimaryCta::ImproveQuality;
    }
    PrimaryCta::OpenWorkspace
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FieldTier, ToolImpact};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn tier(percentage: u8, complete: bool) -> FieldTier {
        FieldTier {
            percentage,
            complete,
            filled_fields: 0,
            total_fields: 0,
            fields: vec![],
        }
    }

    fn completion(overall: u8, tier1_complete: bool) -> CompletionAnalysis {
        CompletionAnalysis {
            overall_score: overall,
            tier1_essential: tier(if tier1_complete { 100 } else { 60 }, tier1_complete),
            tier2_context: tier(40, false),
            tier3_intelligence: tier(10, false),
            tool_readiness: HashMap::new(),
            recommendations: vec![],
        }
    }

    fn quality_with_brain(score: u8) -> QualityAnalysis {
        let mut tool_impact = HashMap::new();
        tool_impact.insert(
            BUSINESS_BRAIN.to_string(),
            ToolImpact {
                quality_score: score,
                blockers: vec![],
                enhancers: vec![],
            },
        );
        QualityAnalysis {
            overall_score: score,
            field_quality: HashMap::new(),
            cross_field_coherence: None,
            tool_impact,
            top_recommendations: vec![],
            analyzed_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
        }
    }

    fn quality_without_brain(score: u8) -> QualityAnalysis {
        QualityAnalysis {
            tool_impact: HashMap::new(),
            ..quality_with_brain(score)
        }
    }

    #[test]
    fn health_display_with_both_analyses() {
        let q = quality_with_brain(64);
        let c = completion(72, true);
        let h = health_display(Some(&q), Some(&c));
        assert_eq!(h.primary_score, Some(64));
        assert_eq!(h.coverage_score, Some(72));
        assert_eq!(h.primary_label, "Knowledge base quality");
    }

    #[test]
    fn health_display_without_quality() {
        let c = completion(100, true);
        let h = health_display(None, Some(&c));
        assert_eq!(h.primary_score, None);
        assert_eq!(h.coverage_score, Some(100));
        assert_eq!(h.primary_label, "Not yet analyzed");
    }

    #[test]
    fn health_display_with_nothing() {
        let h = health_display(None, None);
        assert_eq!(h.primary_score, None);
        assert_eq!(h.coverage_score, None);
        assert_eq!(h.primary_label, "Not yet analyzed");
    }

    #[test]
    fn brain_not_ready_at_59() {
        let q = quality_with_brain(59);
        let r = business_brain_readiness(Some(&q));
        assert!(!r.ready);
        assert_eq!(r.band, QualityBand::Basic);
        assert_eq!(r.message, "Improve profile quality for better AI answers");
    }

    #[test]
    fn brain_ready_at_60() {
        let q = quality_with_brain(60);
        let r = business_brain_readiness(Some(&q));
        assert!(r.ready);
        assert_eq!(r.band, QualityBand::Good);
        assert_eq!(r.message, "Ready for AI conversations");
    }

    #[test]
    fn brain_insufficient_below_40() {
        let q = quality_with_brain(39);
        let r = business_brain_readiness(Some(&q));
        assert!(!r.ready);
        assert_eq!(r.band, QualityBand::Insufficient);
    }

    #[test]
    fn brain_without_tool_entry_prompts_quality_check() {
        let q = quality_without_brain(90);
        let r = business_brain_readiness(Some(&q));
        assert_eq!(r.score, 0);
        assert!(!r.ready);
        assert_eq!(r.message, "Run quality check to see readiness");

        let r = business_brain_readiness(None);
        assert_eq!(r.message, "Run quality check to see readiness");
    }

    #[test]
    fn enrichment_boundary_at_50() {
        assert!(!is_enriched_with_ai(
            Some(&quality_with_brain(49)),
            BUSINESS_BRAIN
        ));
        assert!(is_enriched_with_ai(
            Some(&quality_with_brain(50)),
            BUSINESS_BRAIN
        ));
        assert!(!is_enriched_with_ai(None, BUSINESS_BRAIN));
        assert!(!is_enriched_with_ai(Some(&quality_with_brain(90)), "unknownTool"));
    }

    #[test]
    fn milestone_is_none_once_brain_ready() {
        assert!(next_milestone(Some(&quality_with_brain(60))).is_none());
    }

    #[test]
    fn milestone_message_depends_only_on_analysis_presence() {
        let with = next_milestone(Some(&quality_with_brain(30))).unwrap();
        let without = next_milestone(None).unwrap();
        assert_ne!(with.message, without.message);
        assert_eq!(
            without.message,
            "Run your first quality check to unlock AI conversations"
        );
    }

    #[test]
    fn cta_prefers_essentials_first() {
        assert_eq!(
            primary_cta(Some(&completion(40, false)), None),
            PrimaryCta::CompleteEssentials
        );
        assert_eq!(primary_cta(None, None), PrimaryCta::CompleteEssentials);
    }

    #[test]
    fn cta_runs_quality_check_when_essentials_done_and_unanalyzed() {
        let c = completion(100, true);
        let cta = primary_cta(Some(&c), None);
        assert_eq!(cta, PrimaryCta::RunQualityCheck);
        assert_eq!(cta.label(), "Run quality check");
    }

    #[test]
    fn cta_improves_quality_until_brain_ready() {
        let c = completion(100, true);
        assert_eq!(
            primary_cta(Some(&c), Some(&quality_with_brain(45))),
            PrimaryCta::ImproveQuality
        );
        assert_eq!(
            primary_cta(Some(&c), Some(&quality_with_brain(60))),
            PrimaryCta::OpenWorkspace
        );
    }
}
