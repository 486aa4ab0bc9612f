// src/catalog.rs
use tracing::info;

use crate::api_client::{ApiClient, RemoteFetchError};
use crate::model::CatalogExercise;

impl ApiClient {
    /// Lists catalog exercises, optionally filtered by name on the server side.
    pub async fn list_exercises(
        &self,
        name_filter: Option<&str>,
    ) -> Result<Vec<CatalogExercise>, RemoteFetchError> {
        let query: Vec<(&str, &str)> = match name_filter.map(str::trim) {
            Some(name) if !name.is_empty() => vec![("name", name)],
            _ => Vec::new(),
        };
        let exercises: Vec<CatalogExercise> = self.get_json("/exercises", &query).await?;
        info!("Catalog returned {} exercises", exercises.len());
        Ok(exercises)
    }

    pub async fn get_exercise(&self, id: &str) -> Result<CatalogExercise, RemoteFetchError> {
        self.get_json(&format!("/exercises/{}", id.trim()), &[]).await
    }
}
