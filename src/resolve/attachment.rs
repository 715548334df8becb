//! Imported-attachment resolution.

use crate::error::ApiError;
use crate::generator::ImportedAttachment;
use crate::repository::AttachmentClient;
use crate::types::ModelCoordinate;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AttachmentResolver {
    client: Arc<dyn AttachmentClient>,
}

impl AttachmentResolver {
    pub fn new(client: Arc<dyn AttachmentClient>) -> Self {
        Self { client }
    }

    /// The file the model was imported from, if any.
    ///
    /// When several attachments carry the imported tag, the first one in
    /// listing order wins. Repository failures are logged and yield `None`.
    pub async fn resolve(&self, id: &ModelCoordinate) -> Option<ImportedAttachment> {
        match self.find_imported(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(model = %id, error = %e, "Failed to resolve imported attachment");
                None
            }
        }
    }

    async fn find_imported(
        &self,
        id: &ModelCoordinate,
    ) -> Result<Option<ImportedAttachment>, ApiError> {
        let attachments = self.client.list_attachments(id).await?;
        let Some(imported) = attachments.into_iter().find(|a| a.is_imported()) else {
            debug!(model = %id, "Model has no imported attachment");
            return Ok(None);
        };

        let content = self
            .client
            .download_attachment(id, &imported.filename)
            .await?;
        Ok(Some(ImportedAttachment {
            filename: imported.filename,
            content,
        }))
    }
}
