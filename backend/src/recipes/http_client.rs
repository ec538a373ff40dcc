//! HTTP client for the recipe-lookup endpoint.

use async_trait::async_trait;
use shared::{RecipeRecord, RecipeResponse};

use super::{RecipeFetchError, RecipeSource};

/// Client for the collaborator's fetch-by-id endpoint:
/// `GET {base_url}/{recipe_id}` returning `{ "data": { ... } }`.
#[derive(Debug, Clone)]
pub struct HttpRecipeClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpRecipeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpRecipeClient {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    /// Attach the bearer token the CMS requires.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeClient {
    async fn fetch_recipe(&self, recipe_id: &str) -> Result<RecipeRecord, RecipeFetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), recipe_id);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| RecipeFetchError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(RecipeFetchError::Status(response.status().as_u16()));
        }

        let body: RecipeResponse = response
            .json()
            .await
            .map_err(|err| RecipeFetchError::Transport(err.to_string()))?;
        body.data.ok_or(RecipeFetchError::MissingData)
    }
}
