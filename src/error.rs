use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrnagenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Daily generation limit reached")]
    QuotaExceeded,

    #[error("Rate limited by {endpoint} after {attempts} attempts")]
    RateLimited { endpoint: String, attempts: u32 },

    #[error("Model at {endpoint} is still loading, retry in {retry_after_secs}s")]
    ModelLoading {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error("All models failed, last: {status} from {endpoint}: {message}")]
    UpstreamUnavailable {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl OrnagenError {
    /// User-facing advice, keyed off status keywords in the error text.
    pub fn guidance(&self) -> &'static str {
        match self {
            OrnagenError::QuotaExceeded => {
                "You have used all of today's generations. The counter resets at midnight."
            }
            OrnagenError::RateLimited { .. } => {
                "Rate limit reached. Wait a little while before retrying, or consider a paid inference plan."
            }
            OrnagenError::ModelLoading { .. } => {
                "The model is warming up. First requests can take 10-30 seconds; try again shortly."
            }
            other => {
                let text = other.to_string();
                if text.contains("CORS") || text.contains("cors") {
                    "A CORS restriction blocked the request. Route the call through the proxy server instead of the browser."
                } else if text.contains("403") || text.contains("Forbidden") {
                    "The API key was rejected. Check that HUGGINGFACE_API_KEY is set and has Read permission."
                } else if text.contains("429") || text.contains("Rate limit") {
                    "Rate limit reached. Wait a little while before retrying."
                } else if text.contains("503") || text.contains("loading") {
                    "The model is warming up. First requests can take 10-30 seconds; try again shortly."
                } else {
                    "Check your Hugging Face API key and try again later. The models may be temporarily unavailable."
                }
            }
        }
    }

    /// True when retrying the same request later can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrnagenError::RateLimited { .. }
                | OrnagenError::ModelLoading { .. }
                | OrnagenError::UpstreamUnavailable { .. }
        )
    }
}

impl From<reqwest::Error> for OrnagenError {
    fn from(err: reqwest::Error) -> Self {
        OrnagenError::RequestError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrnagenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_matches_error_category() {
        let gone = OrnagenError::UpstreamUnavailable {
            endpoint: "https://example.test/model".into(),
            status: 403,
            message: "Forbidden".into(),
        };
        assert!(gone.guidance().contains("API key"));

        let loading = OrnagenError::ModelLoading {
            endpoint: "https://example.test/model".into(),
            retry_after_secs: 2,
        };
        assert!(loading.guidance().contains("warming up"));

        assert!(OrnagenError::QuotaExceeded.guidance().contains("midnight"));
    }

    #[test]
    fn upstream_errors_are_retryable() {
        let err = OrnagenError::UpstreamUnavailable {
            endpoint: "e".into(),
            status: 500,
            message: "m".into(),
        };
        assert!(err.is_retryable());
        assert!(!OrnagenError::ValidationError("missing motif".into()).is_retryable());
    }
}
