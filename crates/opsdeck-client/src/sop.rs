use opsdeck_core::sop::{
    current_version, fallback_version, find_version, SopContent, SopDocument, SopVersion,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::Result;

// ─── SopSession ───────────────────────────────────────────────────────────

/// Version-aware view of one SOP.
///
/// Holds the loaded document, its version list, and the version currently
/// on screen. The server is the only authority on which version is current:
/// every mutation here re-fetches rather than flipping flags locally, and a
/// failed operation leaves the previous state untouched.
#[derive(Debug)]
pub struct SopSession<'a> {
    client: &'a ApiClient,
    doc: SopDocument,
    versions: Vec<SopVersion>,
    selected_version_id: String,
    selected_content: SopContent,
}

impl<'a> SopSession<'a> {
    /// Fetch the document and its version list.
    ///
    /// A failing or empty versions endpoint degrades to a single synthetic
    /// version built from the document itself (pre-versioning data), so
    /// there is always at least one selectable version.
    pub async fn open(client: &'a ApiClient, sop_id: &str) -> Result<SopSession<'a>> {
        let doc = client.sop(sop_id).await?;
        let versions = fetch_versions(client, &doc).await;

        let selected = current_version(&versions);
        let selected_version_id = selected
            .map(|v| v.id.clone())
            .unwrap_or_else(|| doc.id.clone());
        let selected_content = selected
            .and_then(|v| v.content.clone())
            .unwrap_or_else(|| doc.content.clone());

        Ok(SopSession {
            client,
            doc,
            versions,
            selected_version_id,
            selected_content,
        })
    }

    pub fn document(&self) -> &SopDocument {
        &self.doc
    }

    pub fn versions(&self) -> &[SopVersion] {
        &self.versions
    }

    pub fn selected_version_id(&self) -> &str {
        &self.selected_version_id
    }

    pub fn selected_content(&self) -> &SopContent {
        &self.selected_content
    }

    /// Switch the displayed content to another version.
    ///
    /// Tries the direct by-id fetch first, then falls back to scanning the
    /// bulk version listing. Never touches `is_current_version` flags.
    pub async fn select(&mut self, version_id: &str) -> Result<()> {
        let content = match self.client.sop(version_id).await {
            Ok(doc) => Some(doc.content),
            Err(e) => {
                tracing::debug!(error = %e, version_id, "direct version fetch failed, scanning the listing");
                let versions = self.client.sop_versions(&self.doc.id).await?;
                find_version(&versions, version_id).and_then(|v| v.content.clone())
            }
        };

        let Some(content) = content else {
            return Err(ApiError::ContentUnavailable(format!(
                "version {version_id} has no stored content"
            )));
        };

        self.selected_version_id = version_id.to_string();
        self.selected_content = content;
        Ok(())
    }

    /// Make `version_id` the current version, then reload everything from
    /// the server. Restore creates a new current pointer server-side, so
    /// local guesses about flags would diverge immediately.
    pub async fn restore(&mut self, version_id: &str) -> Result<()> {
        self.client.restore_sop(&self.doc.id, version_id).await?;

        let doc = self.client.sop(&self.doc.id).await?;
        let versions = fetch_versions(self.client, &doc).await;
        let selected = current_version(&versions);
        let selected_version_id = selected
            .map(|v| v.id.clone())
            .unwrap_or_else(|| doc.id.clone());
        let selected_content = selected
            .and_then(|v| v.content.clone())
            .unwrap_or_else(|| doc.content.clone());

        self.doc = doc;
        self.versions = versions;
        self.selected_version_id = selected_version_id;
        self.selected_content = selected_content;
        Ok(())
    }
}

async fn fetch_versions(client: &ApiClient, doc: &SopDocument) -> Vec<SopVersion> {
    match client.sop_versions(&doc.id).await {
        Ok(versions) if !versions.is_empty() => versions,
        Ok(_) => {
            tracing::debug!(sop_id = %doc.id, "no versions recorded, using the document as its own version");
            vec![fallback_version(doc)]
        }
        Err(e) => {
            tracing::warn!(sop_id = %doc.id, error = %e, "versions endpoint unavailable, using the document as its own version");
            vec![fallback_version(doc)]
        }
    }
}
