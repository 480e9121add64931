use opsdeck_client::ApiClient;

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// docs
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let documents = client.documents().await.map_err(super::surface)?;

    if json {
        return print_json(&documents);
    }

    if documents.is_empty() {
        println!("No documents uploaded yet.");
        return Ok(());
    }

    let rows = documents
        .iter()
        .map(|d| {
            vec![
                d.file_name.clone(),
                d.extraction_status.as_str().to_string(),
                d.extraction_error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["file", "extraction", "error"], rows);
    Ok(())
}
