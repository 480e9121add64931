use serde::Serialize;

use crate::analysis::{CompletionAnalysis, Priority, QualityAnalysis};
use crate::score::estimate_time_to_ready;

/// A recommendation qualifies as a quick win at or under this many minutes.
pub const QUICK_WIN_MAX_MINUTES: u32 = 5;

/// At most this many quick wins are surfaced, in merged-list order.
pub const QUICK_WIN_LIMIT: usize = 2;

// ---------------------------------------------------------------------------
// RankedRecommendation
// ---------------------------------------------------------------------------

/// Which analysis a merged recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Quality,
    Completion,
}

/// A recommendation from either analysis, annotated with the fields it
/// touches and the time estimate used for quick-win ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecommendation {
    pub source: RecommendationSource,
    pub priority: Priority,
    pub message: String,
    pub fields: Vec<String>,
    pub time_estimate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

// ---------------------------------------------------------------------------
// Pipeline: merge -> annotate -> partition -> cap
// ---------------------------------------------------------------------------

/// Merge both recommendation lists into one annotated list, quality
/// recommendations first. Without a completion analysis there is nothing to
/// rank and the result is empty.
pub fn merge_recommendations(
    completion: Option<&CompletionAnalysis>,
    quality: Option<&QualityAnalysis>,
) -> Vec<RankedRecommendation> {
    let Some(completion) = completion else {
        return vec![];
    };

    let mut merged = Vec::new();

    if let Some(quality) = quality {
        for rec in &quality.top_recommendations {
            let fields: Vec<String> = rec.field.iter().cloned().collect();
            let time_estimate = estimate_time_to_ready(&fields);
            merged.push(RankedRecommendation {
                source: RecommendationSource::Quality,
                priority: rec.priority,
                message: rec.message.clone(),
                fields,
                time_estimate,
                category: None,
                benefit: None,
                impact: rec.impact.clone(),
            });
        }
    }

    for rec in &completion.recommendations {
        let time_estimate = estimate_time_to_ready(&rec.fields);
        merged.push(RankedRecommendation {
            source: RecommendationSource::Completion,
            priority: rec.priority,
            message: rec.message.clone(),
            fields: rec.fields.clone(),
            time_estimate,
            category: Some(rec.category.clone()),
            benefit: rec.benefit.clone(),
            impact: None,
        });
    }

    merged
}

/// The first [`QUICK_WIN_LIMIT`] recommendations at or under
/// [`QUICK_WIN_MAX_MINUTES`], preserving merged-list order. An order-based
/// truncation, not a best-by-priority selection.
pub fn quick_wins(merged: &[RankedRecommendation]) -> Vec<RankedRecommendation> {
    merged
        .iter()
        .filter(|r| r.time_estimate <= QUICK_WIN_MAX_MINUTES)
        .take(QUICK_WIN_LIMIT)
        .cloned()
        .collect()
}

/// Everything in the merged list that is not already shown as a quick win.
///
/// Exclusion is by message text: two distinct recommendations sharing a
/// message are both dropped when either is a quick win.
pub fn remaining_tasks(
    merged: &[RankedRecommendation],
    quick: &[RankedRecommendation],
) -> Vec<RankedRecommendation> {
    merged
        .iter()
        .filter(|r| !quick.iter().any(|q| q.message == r.message))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// TaskBoard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoard {
    pub quick_wins: Vec<RankedRecommendation>,
    pub all_tasks: Vec<RankedRecommendation>,
}

/// Run the full pipeline over both analyses.
pub fn task_board(
    completion: Option<&CompletionAnalysis>,
    quality: Option<&QualityAnalysis>,
) -> TaskBoard {
    let merged = merge_recommendations(completion, quality);
    let quick_wins = quick_wins(&merged);
    let all_tasks = remaining_tasks(&merged, &quick_wins);
    TaskBoard {
        quick_wins,
        all_tasks,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        CompletionRecommendation, FieldTier, QualityRecommendation,
    };
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn tier() -> FieldTier {
        FieldTier {
            percentage: 50,
            complete: false,
            filled_fields: 1,
            total_fields: 2,
            fields: vec![],
        }
    }

    fn completion_with(recs: Vec<CompletionRecommendation>) -> CompletionAnalysis {
        CompletionAnalysis {
            overall_score: 50,
            tier1_essential: tier(),
            tier2_context: tier(),
            tier3_intelligence: tier(),
            tool_readiness: HashMap::new(),
            recommendations: recs,
        }
    }

    fn quality_with(recs: Vec<QualityRecommendation>) -> QualityAnalysis {
        QualityAnalysis {
            overall_score: 50,
            field_quality: HashMap::new(),
            cross_field_coherence: None,
            tool_impact: HashMap::new(),
            top_recommendations: recs,
            analyzed_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
        }
    }

    fn completion_rec(priority: Priority, message: &str, fields: &[&str]) -> CompletionRecommendation {
        CompletionRecommendation {
            priority,
            category: "essentials".into(),
            message: message.into(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
            benefit: None,
        }
    }

    fn quality_rec(priority: Priority, message: &str, field: Option<&str>) -> QualityRecommendation {
        QualityRecommendation {
            priority,
            field: field.map(|s| s.to_string()),
            message: message.into(),
            impact: None,
        }
    }

    #[test]
    fn merge_puts_quality_recommendations_first() {
        let c = completion_with(vec![completion_rec(Priority::High, "fill fields", &["a"])]);
        let q = quality_with(vec![quality_rec(Priority::Low, "sharpen copy", Some("b"))]);
        let merged = merge_recommendations(Some(&c), Some(&q));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source, RecommendationSource::Quality);
        assert_eq!(merged[0].message, "sharpen copy");
        assert_eq!(merged[1].source, RecommendationSource::Completion);
    }

    #[test]
    fn merge_annotates_fields_and_estimates() {
        let c = completion_with(vec![completion_rec(
            Priority::High,
            "fill three",
            &["a", "b", "c"],
        )]);
        let q = quality_with(vec![
            quality_rec(Priority::Medium, "singular field", Some("x")),
            quality_rec(Priority::Medium, "no field", None),
        ]);
        let merged = merge_recommendations(Some(&c), Some(&q));
        assert_eq!(merged[0].fields, vec!["x".to_string()]);
        assert_eq!(merged[0].time_estimate, 2);
        assert!(merged[1].fields.is_empty());
        assert_eq!(merged[1].time_estimate, 2);
        assert_eq!(merged[2].time_estimate, 6);
    }

    #[test]
    fn merge_without_completion_is_empty() {
        let q = quality_with(vec![quality_rec(Priority::High, "anything", None)]);
        assert!(merge_recommendations(None, Some(&q)).is_empty());
        assert!(merge_recommendations(None, None).is_empty());
    }

    #[test]
    fn quick_wins_cap_at_two_preserving_order() {
        // Three eligible entries; the third is high priority but arrives last
        // and is still cut by the cap.
        let c = completion_with(vec![
            completion_rec(Priority::Low, "first", &["a"]),
            completion_rec(Priority::Low, "second", &["b"]),
            completion_rec(Priority::High, "third", &["c"]),
        ]);
        let merged = merge_recommendations(Some(&c), None);
        let wins = quick_wins(&merged);
        assert_eq!(wins.len(), 2);
        assert_eq!(wins[0].message, "first");
        assert_eq!(wins[1].message, "second");
    }

    #[test]
    fn quick_wins_respect_time_threshold() {
        let c = completion_with(vec![
            completion_rec(Priority::High, "slow", &["a", "b", "c"]),
            completion_rec(Priority::Low, "fast", &["a"]),
        ]);
        let merged = merge_recommendations(Some(&c), None);
        let wins = quick_wins(&merged);
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].message, "fast");
    }

    #[test]
    fn remainder_excludes_by_message_text() {
        // Two distinct recommendations share a message. Only the quality one
        // qualifies as a quick win, yet the slow completion twin is also
        // dropped from the remainder because exclusion matches message text.
        let c = completion_with(vec![
            completion_rec(Priority::High, "add your industry", &["a", "b", "c", "d"]),
            completion_rec(Priority::High, "slow item", &["a", "b", "c", "d"]),
        ]);
        let q = quality_with(vec![quality_rec(
            Priority::Medium,
            "add your industry",
            Some("industry"),
        )]);
        let merged = merge_recommendations(Some(&c), Some(&q));
        assert_eq!(merged.len(), 3);

        let wins = quick_wins(&merged);
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].source, RecommendationSource::Quality);

        let rest = remaining_tasks(&merged, &wins);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].message, "slow item");
    }

    #[test]
    fn task_board_empty_inputs_yield_empty_outputs() {
        let board = task_board(None, None);
        assert!(board.quick_wins.is_empty());
        assert!(board.all_tasks.is_empty());
    }

    #[test]
    fn task_board_runs_full_pipeline() {
        let c = completion_with(vec![
            completion_rec(Priority::Low, "one", &["a"]),
            completion_rec(Priority::Low, "two", &["b"]),
            completion_rec(Priority::Low, "three", &["c", "d", "e"]),
        ]);
        let board = task_board(Some(&c), None);
        assert_eq!(board.quick_wins.len(), 2);
        assert_eq!(board.all_tasks.len(), 1);
        assert_eq!(board.all_tasks[0].message, "three");
    }
}
