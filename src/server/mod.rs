use actix_web::http::{Method, StatusCode};
use actix_web::{web, App, HttpResponse, HttpResponseBuilder, HttpServer};

use crate::config::{Config, HuggingFaceConfig};
use crate::error::{OrnagenError, Result};
use crate::huggingface::{ImageClient, OrnamentClient};
use crate::models::{ProxyErrorBody, ProxyRequest, ProxyResponse};

pub struct AppState {
    pub client: ImageClient,
}

/// Every response, success or error, carries the permissive CORS headers
/// browser callers need.
fn respond(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"));
    builder
}

async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<ProxyRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    if request.prompt.trim().is_empty() {
        return respond(StatusCode::BAD_REQUEST).json(ProxyErrorBody::new("Prompt is required"));
    }
    if let Some(api_type) = &request.api_type {
        log::debug!("Requested apiType: {}", api_type);
    }

    let width = request.width.unwrap_or(512);
    let height = request.height.unwrap_or(512);

    match state.client.generate(&request.prompt, width, height).await {
        Ok(payload) => respond(StatusCode::OK).json(ProxyResponse {
            image: payload.to_data_url(),
        }),
        Err(err) => error_response(err),
    }
}

fn error_response(err: OrnagenError) -> HttpResponse {
    let guidance = err.guidance().to_string();
    let text = err.to_string();

    let (status, body) = match err {
        OrnagenError::ValidationError(message) => {
            (StatusCode::BAD_REQUEST, ProxyErrorBody::new(message))
        }
        OrnagenError::RateLimited { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            ProxyErrorBody::new("Rate limited")
                .with_message(text)
                .with_suggestion(guidance),
        ),
        OrnagenError::ModelLoading { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ProxyErrorBody::new("Model is loading")
                .with_message(text)
                .with_suggestion(guidance),
        ),
        OrnagenError::UpstreamUnavailable {
            endpoint,
            status,
            message,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ProxyErrorBody::new("All models failed")
                .with_message(format!(
                    "Model: {}\nStatus: {}\nMessage: {}",
                    endpoint, status, message
                ))
                .with_suggestion(
                    "Please check your Hugging Face API key and try again later. \
                     If the problem persists, the models may be temporarily unavailable.",
                ),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ProxyErrorBody::new("Internal server error").with_message(text),
        ),
    };

    respond(status).json(body)
}

async fn preflight() -> HttpResponse {
    respond(StatusCode::OK).finish()
}

async fn method_not_allowed() -> HttpResponse {
    respond(StatusCode::METHOD_NOT_ALLOWED).json(ProxyErrorBody::new("Method not allowed"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generate-image")
            .route(web::post().to(generate_image))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::route().to(method_not_allowed)),
    )
    .default_service(web::route().to(method_not_allowed));
}

/// Binds the proxy and serves until shutdown. The credential stays inside
/// the [`ImageClient`]; nothing in this module serializes it.
pub async fn run(config: Config) -> Result<()> {
    let hf_config = config
        .huggingface
        .unwrap_or_else(HuggingFaceConfig::from_env);
    let server_config = config.server.unwrap_or_default();
    let host = server_config.host.unwrap_or_else(|| "127.0.0.1".to_string());
    let port = server_config.port.unwrap_or(8787);

    let client = OrnamentClient::new(hf_config)?;
    let state = web::Data::new(AppState {
        client: client.image().clone(),
    });

    log::info!("🌐 Proxy listening on http://{}:{}", host, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host.as_str(), port))
        .map_err(|e| OrnagenError::ConfigError(format!("Failed to bind {}:{}: {}", host, port, e)))?
        .run()
        .await
        .map_err(|e| OrnagenError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelEndpoint;
    use actix_web::test;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn state_with_endpoints(endpoints: Vec<ModelEndpoint>) -> web::Data<AppState> {
        let client = ImageClient::new(reqwest::Client::new(), endpoints, Some("hf_test".into()))
            .with_policy(crate::huggingface::RetryPolicy {
                max_attempts: 1,
                model_loading_delay: Duration::ZERO,
                rate_limit_unit: Duration::ZERO,
            });
        web::Data::new(AppState { client })
    }

    #[actix_web::test]
    async fn preflight_returns_permissive_cors() {
        let state = state_with_endpoints(vec![]);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::with_uri("/generate-image")
            .method(Method::OPTIONS)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(
            headers.get("Access-Control-Allow-Methods").unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type"
        );
    }

    #[actix_web::test]
    async fn non_post_method_is_rejected() {
        let state = state_with_endpoints(vec![]);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/generate-image")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: ProxyErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Method not allowed");
    }

    #[actix_web::test]
    async fn missing_prompt_is_a_bad_request() {
        let state = state_with_endpoints(vec![]);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(serde_json::json!({
                "prompt": "  ",
                "width": 512,
                "height": 512,
                "apiType": "huggingface"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ProxyErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Prompt is required");
    }

    #[actix_web::test]
    async fn successful_generation_returns_data_url_without_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_STUB.to_vec(), "image/png"))
            .mount(&server)
            .await;

        let state = state_with_endpoints(vec![ModelEndpoint::new(
            format!("{}/model", server.uri()),
            768,
            768,
        )]);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(serde_json::json!({
                "prompt": "star, ornament",
                "width": 512,
                "height": 512,
                "apiType": "huggingface"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );

        let raw = test::read_body(resp).await;
        let text = String::from_utf8(raw.to_vec()).unwrap();
        assert!(!text.contains("hf_test"));

        let body: ProxyResponse = serde_json::from_str(&text).unwrap();
        assert!(body.image.starts_with("data:image/png;base64,"));
    }

    #[actix_web::test]
    async fn upstream_exhaustion_maps_to_structured_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let state = state_with_endpoints(vec![ModelEndpoint::new(
            format!("{}/model", server.uri()),
            768,
            768,
        )]);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(serde_json::json!({ "prompt": "star, ornament" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ProxyErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "All models failed");
        assert!(body.message.unwrap().contains("Status: 500"));
        assert!(body.suggestion.is_some());
    }
}
