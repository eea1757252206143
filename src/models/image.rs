use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{OrnagenError, Result};
use crate::models::common::{translate_motif, Style};

/// One user-initiated generation, discarded after it produces a payload or
/// fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub motif: String,
    pub style: Style,
    pub width: u32,
    pub height: u32,
}

impl GenerationRequest {
    pub fn new(motif: impl Into<String>, style: Style, width: u32, height: u32) -> Self {
        Self {
            motif: motif.into(),
            style,
            width,
            height,
        }
    }

    /// Full prompt sent upstream: translated motif, then the style suffix.
    pub fn prompt(&self) -> String {
        format!(
            "{}, {}",
            translate_motif(self.motif.trim()),
            self.style.prompt_suffix()
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.motif.trim().is_empty() {
            return Err(OrnagenError::ValidationError("Motif is required".into()));
        }
        Ok(())
    }
}

/// Embedded image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    /// Serializes as `data:<mime>;base64,<bytes>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    pub fn from_data_url(url: &str) -> Result<ImagePayload> {
        let rest = url.strip_prefix("data:").ok_or_else(|| {
            OrnagenError::InvalidResponse("Invalid image data received from API".into())
        })?;
        let (mime, data) = rest.split_once(";base64,").ok_or_else(|| {
            OrnagenError::InvalidResponse("Invalid image data received from API".into())
        })?;
        if !mime.starts_with("image/") {
            return Err(OrnagenError::InvalidResponse(format!(
                "Unexpected payload type: {}",
                mime
            )));
        }
        let bytes = BASE64
            .decode(data)
            .map_err(|e| OrnagenError::InvalidResponse(e.to_string()))?;
        Ok(ImagePayload::new(bytes, mime))
    }
}

/// One generated image paired with the style and motif that produced it.
#[derive(Debug, Clone)]
pub struct StyledImage {
    pub style: Style,
    pub motif: String,
    pub payload: ImagePayload,
}

impl StyledImage {
    /// Download filename: style id, motif text, and a millisecond timestamp.
    pub fn file_name(&self, timestamp_millis: i64) -> String {
        let motif = self.motif.replace(['/', '\\'], "_");
        format!(
            "noel-atelier-{}-{}-{}.png",
            self.style.id(),
            motif,
            timestamp_millis
        )
    }
}

/// Failure recorded for one upstream candidate before moving on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub status: u16,
    pub message: String,
    pub endpoint: String,
}

impl UpstreamFailure {
    pub fn new(status: u16, message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.len() > 1000 {
            let mut end = 1000;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Self {
            status,
            message,
            endpoint: endpoint.into(),
        }
    }
}

/// Wire request accepted by the proxy route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub prompt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "apiType")]
    pub api_type: Option<String>,
}

/// Successful proxy response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub image: String,
}

/// Structured proxy error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ProxyErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            suggestion: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_translates_motif_and_appends_suffix() {
        let request = GenerationRequest::new("星", Style::Crystal, 1024, 1024);
        let prompt = request.prompt();
        assert!(prompt.starts_with("star, "));
        assert!(prompt.ends_with(Style::Crystal.prompt_suffix()));
    }

    #[test]
    fn empty_motif_fails_validation() {
        let request = GenerationRequest::new("   ", Style::Papercraft, 512, 512);
        assert!(matches!(
            request.validate(),
            Err(OrnagenError::ValidationError(_))
        ));
    }

    #[test]
    fn data_url_round_trip() {
        let payload = ImagePayload::png(vec![0x89, 0x50, 0x4e, 0x47]);
        let url = payload.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(ImagePayload::from_data_url(&url).unwrap(), payload);
    }

    #[test]
    fn non_image_data_url_is_rejected() {
        assert!(ImagePayload::from_data_url("data:text/plain;base64,aGk=").is_err());
        assert!(ImagePayload::from_data_url("not a data url").is_err());
    }

    #[test]
    fn upstream_failure_truncates_long_messages() {
        let failure = UpstreamFailure::new(500, "x".repeat(4000), "https://example.test");
        assert_eq!(failure.message.len(), 1000);
    }

    #[test]
    fn proxy_request_uses_camel_case_api_type() {
        let parsed: ProxyRequest = serde_json::from_str(
            r#"{"prompt":"star","width":512,"height":512,"apiType":"huggingface"}"#,
        )
        .unwrap();
        assert_eq!(parsed.api_type.as_deref(), Some("huggingface"));
    }

    #[test]
    fn file_name_includes_style_motif_and_timestamp() {
        let image = StyledImage {
            style: Style::Snowglobe,
            motif: "星".into(),
            payload: ImagePayload::png(vec![1]),
        };
        assert_eq!(
            image.file_name(1700000000000),
            "noel-atelier-snowglobe-星-1700000000000.png"
        );
    }
}
