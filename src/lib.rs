pub mod config;
pub mod error;
pub mod huggingface;
pub mod logger;
pub mod models;
pub mod quota;
pub mod render;
#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, HuggingFaceConfig, QuotaConfig, ServerConfig};
pub use error::{OrnagenError, Result};
pub use huggingface::{ImageClient, OrnamentClient, RetryPolicy};
pub use models::{
    DailyQuota, GenerationRequest, ImagePayload, ModelEndpoint, ProxyErrorBody, ProxyRequest,
    ProxyResponse, SizePreset, Style, StyledImage, UpstreamFailure, RANDOM_MOTIFS,
};
pub use quota::{FileQuotaStore, MemoryQuotaStore, QuotaManager, QuotaStore};
pub use render::PlaceholderRenderer;
