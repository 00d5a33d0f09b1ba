//! Relay server: a stateless passthrough that fetches a page on the caller's behalf.
//!
//! `GET <path>?url=<address>` answers 200 with the upstream body verbatim
//! (and its content type, HTML when the upstream gives none),
//! 400 when `url` is missing and 500 with a plain-text reason when the
//! upstream fetch fails or is not 2xx.

use crate::config::RelayServerConfig;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::collections::HashMap;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
struct RelayState {
    client: reqwest::Client,
}

/// Build the relay router.
pub fn router(config: &RelayServerConfig) -> Result<Router, reqwest::Error> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.upstream_timeout)
        .build()?;

    Ok(Router::new()
        .route(&config.path, get(relay))
        .layer(CorsLayer::permissive())
        .with_state(RelayState { client }))
}

/// Serve the relay on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, config: &RelayServerConfig) -> anyhow::Result<()> {
    let app = router(config)?;
    info!(
        "Relay listening on {} at {}",
        listener.local_addr()?,
        config.path
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn relay(
    State(state): State<RelayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(target) = params.get("url").filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Please provide a URL parameter.").into_response();
    };

    match fetch(&state.client, target).await {
        Ok((content_type, body)) => (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
                (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET")),
                (header::CONTENT_TYPE, content_type),
            ],
            body,
        )
            .into_response(),
        Err(reason) => {
            error!("Relay fetch of {} failed: {}", target, reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", reason),
            )
                .into_response()
        }
    }
}

async fn fetch(client: &reqwest::Client, target: &str) -> Result<(HeaderValue, String), String> {
    let response = client.get(target).send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("Failed to fetch: {}", status));
    }
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("text/html; charset=utf-8"));
    let body = response.text().await.map_err(|e| e.to_string())?;
    Ok((content_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn(app: Router) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn spawn_relay() -> std::net::SocketAddr {
        spawn(router(&RelayServerConfig::default()).unwrap()).await
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let relay = spawn_relay().await;
        let response = reqwest::get(format!("http://{}/api/fetch", relay)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.text().await.unwrap(), "Please provide a URL parameter.");
    }

    #[tokio::test]
    async fn test_passes_body_through_with_user_agent() {
        let upstream = spawn(Router::new().route(
            "/page",
            get(|headers: axum::http::HeaderMap| async move {
                let ua = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("<a href=\"vless://x\">{}</a>", ua)
            }),
        ))
        .await;
        let relay = spawn_relay().await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/api/fetch", relay))
            .query(&[("url", format!("http://{}/page", upstream))])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = response.text().await.unwrap();
        assert!(body.starts_with("<a href=\"vless://x\">Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_forwards_html_content_type() {
        let upstream = spawn(Router::new().route(
            "/page",
            get(|| async { axum::response::Html("<a href=\"trojan://y\">node</a>") }),
        ))
        .await;
        let relay = spawn_relay().await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/api/fetch", relay))
            .query(&[("url", format!("http://{}/page", upstream))])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers().get_all(header::CONTENT_TYPE).iter().count(),
            1
        );
        assert_eq!(
            response.text().await.unwrap(),
            "<a href=\"trojan://y\">node</a>"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let upstream = spawn(Router::new()).await;
        let relay = spawn_relay().await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/api/fetch", relay))
            .query(&[("url", format!("http://{}/missing", upstream))])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.text().await.unwrap(),
            "Server error: Failed to fetch: 404 Not Found"
        );
    }
}
