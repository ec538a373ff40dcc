//! The recipe-lookup collaborator.
//!
//! The planner never owns recipe data; it reaches the CMS through this seam,
//! one fetch per recipe id. Production uses [`HttpRecipeClient`]; tests
//! implement [`RecipeSource`] in memory.

use async_trait::async_trait;
use shared::RecipeRecord;
use thiserror::Error;

pub mod http_client;

pub use http_client::HttpRecipeClient;

#[derive(Debug, Error)]
pub enum RecipeFetchError {
    #[error("recipe lookup returned status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response carried no recipe data")]
    MissingData,
}

/// Fetch-by-id access to the recipe catalogue.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_recipe(&self, recipe_id: &str) -> Result<RecipeRecord, RecipeFetchError>;
}
