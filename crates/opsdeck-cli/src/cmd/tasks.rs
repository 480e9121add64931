use opsdeck_client::ApiClient;
use opsdeck_core::recommend::{task_board, RankedRecommendation, RecommendationSource};

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// tasks
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let snapshot = client.knowledge_base().await.map_err(super::surface)?;
    let board = task_board(snapshot.completion.as_ref(), snapshot.quality.as_ref());

    if json {
        return print_json(&board);
    }

    if board.quick_wins.is_empty() && board.all_tasks.is_empty() {
        println!("Nothing to do — the knowledge base has no open recommendations.");
        return Ok(());
    }

    if !board.quick_wins.is_empty() {
        println!("Quick wins");
        print_table(&["min", "priority", "task"], rows(&board.quick_wins));
    }

    if !board.all_tasks.is_empty() {
        if !board.quick_wins.is_empty() {
            println!();
        }
        println!("All tasks");
        print_table(&["min", "priority", "task"], rows(&board.all_tasks));
    }
    Ok(())
}

fn rows(recs: &[RankedRecommendation]) -> Vec<Vec<String>> {
    recs.iter()
        .map(|r| {
            let source = match r.source {
                RecommendationSource::Quality => "quality",
                RecommendationSource::Completion => "completion",
            };
            vec![
                format!("~{}", r.time_estimate),
                r.priority.as_str().to_string(),
                format!("{} ({source})", r.message),
            ]
        })
        .collect()
}
