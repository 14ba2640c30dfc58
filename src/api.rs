use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use log::info;

use crate::config::Config;
use crate::error::GatewayError;
use crate::extract::{parse_basic_auth, verify_parameters, Credentials, UpdateParams, UpdateQuery};
use crate::provider::cloudflare::CloudflareApi;

pub struct AppState {
    pub config: Config,
    /// Shared connection pool; per-request bearer tokens are layered on top.
    pub http: reqwest::Client,
}

pub fn create_router(config: Config) -> Router {
    let state = Arc::new(AppState {
        config,
        http: reqwest::Client::new(),
    });

    Router::new()
        // Path aliases for DDNS client compatibility across vendors. Path
        // logic only; no method restriction.
        .route("/nic/update", any(update_dns))
        .route("/update", any(update_dns))
        .route("/auth/dynamic.html", any(update_dns))
        // Quiet browser/crawler noise.
        .route("/favicon.ico", any(no_content))
        .route("/robots.txt", any(no_content))
        .fallback(not_found)
        .layer(middleware::from_fn(require_https))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

/// Rejects any request not confirmed to be HTTPS before routing happens.
/// An explicit non-https URL scheme fails; origin-form targets carry no
/// scheme, so the forwarded-protocol header must vouch for the transport in
/// every case. Guards against proxies that terminate TLS without signaling it.
async fn require_https(request: Request, next: Next) -> Response {
    let scheme_ok = match request.uri().scheme_str() {
        Some(scheme) => scheme.eq_ignore_ascii_case("https"),
        None => true,
    };
    let forwarded_ok = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "https")
        .unwrap_or(false);

    if !scheme_ok || !forwarded_ok {
        return GatewayError::InsecureTransport.into_response();
    }

    next.run(request).await
}

async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let uri = request.uri();
    let path = match uri.query() {
        Some(q) => format!("{}?{}", uri.path(), q),
        None => uri.path().to_string(),
    };
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or("-").trim().to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration = start.elapsed();

    info!(
        target: "access",
        "{} {} \"{}\" {} {} {:.3}ms",
        method, path, user_agent, ip, status, duration.as_secs_f64() * 1000.0
    );

    response
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> Response {
    plain_text(StatusCode::NOT_FOUND, "Not Found.".to_string())
}

async fn update_dns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpdateQuery>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .ok_or(GatewayError::MissingCredentials)?
        .to_str()
        .map_err(|_| GatewayError::MalformedCredentials)?;

    let credentials = parse_basic_auth(auth)?;
    let params = verify_parameters(&query)?;

    inform_api(&state, &credentials, &params).await
}

/// Drives the update cycle: resolve the zone once, then for each hostname in
/// request order resolve its record and overwrite the content. Strictly
/// sequential; the first failure aborts the remaining hostnames with no
/// rollback of updates already applied.
async fn inform_api(
    state: &AppState,
    credentials: &Credentials,
    params: &UpdateParams,
) -> Result<Response, GatewayError> {
    let api = CloudflareApi::new(
        state.http.clone(),
        &state.config.cloudflare.api_base,
        &credentials.password,
    );

    let zone = api.find_zone(&credentials.username).await?;

    for hostname in &params.hostnames {
        let record = api.find_record(&zone, hostname).await?;
        api.update_record(record, &params.ip).await?;
        info!("Updated record {} to {}", hostname, params.ip);
    }

    let body = if params.legacy_format {
        format!(
            "<SUCCESS CODE=\"200\" TEXT=\"Update succeeded.\" IP=\"{}\">",
            params.ip
        )
    } else {
        format!("good {}", params.ip)
    };

    Ok(plain_text(StatusCode::OK, body))
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain;charset=UTF-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from(body),
    )
        .into_response()
}
