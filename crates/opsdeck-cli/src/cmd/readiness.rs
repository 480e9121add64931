use opsdeck_client::ApiClient;
use opsdeck_core::readiness::{
    business_brain_readiness, health_display, next_milestone, primary_cta,
};
use opsdeck_core::score::CompletionTier;

use crate::output::{print_json, print_kv};

// ---------------------------------------------------------------------------
// readiness
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let snapshot = client.knowledge_base().await.map_err(super::surface)?;
    let completion = snapshot.completion.as_ref();
    let quality = snapshot.quality.as_ref();

    let health = health_display(quality, completion);
    let brain = business_brain_readiness(quality);
    let milestone = next_milestone(quality);
    let cta = primary_cta(completion, quality);
    let tier = completion.map(|c| CompletionTier::from_score(c.overall_score));

    if json {
        return print_json(&serde_json::json!({
            "health": health,
            "completionTier": tier.map(CompletionTier::label),
            "businessBrain": brain,
            "nextMilestone": milestone,
            "primaryCta": cta.label(),
        }));
    }

    let score_or_dash = |s: Option<u8>| s.map(|v| format!("{v}/100")).unwrap_or_else(|| "—".into());
    print_kv(&[
        (health.primary_label, score_or_dash(health.primary_score)),
        ("Coverage", score_or_dash(health.coverage_score)),
        (
            "Stage",
            tier.map(|t| t.label().to_string())
                .unwrap_or_else(|| "—".into()),
        ),
        (
            "Business Brain",
            format!("{}/100 ({}) — {}", brain.score, brain.band.label(), brain.message),
        ),
        ("Next step", cta.label().to_string()),
    ]);

    if let Some(milestone) = milestone {
        println!("\n{}", milestone.message);
    }
    Ok(())
}
