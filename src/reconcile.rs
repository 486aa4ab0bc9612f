// src/reconcile.rs
use tracing::debug;

use crate::api_client::{ApiClient, RemoteFetchError};
use crate::model::CatalogExercise;

impl ApiClient {
    /// First catalog exercise returned for a name query, if any.
    /// Blank names short-circuit to `None` without a request.
    pub async fn find_match(&self, name: &str) -> Result<Option<CatalogExercise>, RemoteFetchError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let candidate = self.list_exercises(Some(trimmed)).await?.into_iter().next();
        match &candidate {
            Some(found) => debug!("'{}' matched catalog exercise '{}' ({})", trimmed, found.name, found.id),
            None => debug!("No catalog match for '{}'", trimmed),
        }
        Ok(candidate)
    }
}
