pub mod image_client;

use crate::{
    config::HuggingFaceConfig,
    error::{OrnagenError, Result},
    models::{GenerationRequest, ModelEndpoint, Style, StyledImage},
    render::PlaceholderRenderer,
};

pub use image_client::{ImageClient, RetryPolicy, StatusAction};

#[derive(Clone)]
pub struct OrnamentClient {
    image_client: ImageClient,
    renderer: PlaceholderRenderer,
}

impl OrnamentClient {
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| OrnagenError::ConfigError(e.to_string()))?;

        let endpoints = config
            .endpoints
            .unwrap_or_else(ModelEndpoint::defaults);

        match &config.api_key {
            Some(api_key) => log::info!(
                "✅ Hugging Face credential found (length: {})",
                api_key.len()
            ),
            None => log::warn!(
                "⚠️  No Hugging Face API key configured, requests will be rate limited"
            ),
        }

        Ok(Self {
            image_client: ImageClient::new(http, endpoints, config.api_key),
            renderer: PlaceholderRenderer::new(),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.image_client = self.image_client.with_policy(policy);
        self
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn placeholder(&self) -> &PlaceholderRenderer {
        &self.renderer
    }

    /// Generates one image per style concurrently and joins the batch
    /// all-or-nothing: any style failing fails the whole batch.
    pub async fn generate_batch(
        &self,
        motif: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<StyledImage>> {
        let tasks = Style::ALL.map(|style| {
            let request = GenerationRequest::new(motif, style, width, height);
            async move {
                request.validate()?;
                let payload = self
                    .image_client
                    .generate(&request.prompt(), width, height)
                    .await?;
                Ok::<StyledImage, OrnagenError>(StyledImage {
                    style,
                    motif: request.motif,
                    payload,
                })
            }
        });

        let results = futures::future::join_all(tasks).await;

        let mut images = Vec::with_capacity(results.len());
        for result in results {
            images.push(result?);
        }
        Ok(images)
    }

    /// Local batch counterpart: renders the deterministic placeholder for
    /// every style without touching the network.
    pub fn placeholder_batch(
        &self,
        motif: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<StyledImage>> {
        Style::ALL
            .iter()
            .map(|style| {
                let request = GenerationRequest::new(motif, *style, width, height);
                request.validate()?;
                let payload = self.renderer.render(&request.prompt(), width, height)?;
                Ok(StyledImage {
                    style: *style,
                    motif: request.motif,
                    payload,
                })
            })
            .collect()
    }
}
