use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    serve, Json, Router,
};
use chrono::Utc;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::guidance::{self, GuidanceError};
use crate::llm_interaction::AnthropicClient;
use crate::prayer::{PrayerFilter, PrayerType, PrayerView, PrayerWall, WallStats};
use crate::scripture::{curated_scripture, ScriptureResponse};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<AnthropicClient>,
    pub wall: Arc<PrayerWall>,
    templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(provider: AnthropicClient, wall: PrayerWall) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)
            .context("Failed to load index template")?;
        Ok(Self {
            provider: Arc::new(provider),
            wall: Arc::new(wall),
            templates: Arc::new(env),
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct GuidanceRequest {
    pub question: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ScriptureRequest {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub prayer_type: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PrayerQuery {
    #[serde(rename = "type")]
    pub prayer_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PrayerList {
    pub prayers: Vec<PrayerView>,
    pub stats: WallStats,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PrayerTypeInfo {
    pub value: String,
    pub label: String,
    pub placeholder: String,
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn guidance_handler(
    State(state): State<AppState>,
    payload: Result<Json<GuidanceRequest>, JsonRejection>,
) -> Result<Json<ScriptureResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    let scripture = guidance::ask_guidance(&state.provider, request.question.as_deref()).await?;
    Ok(Json(scripture))
}

async fn scripture_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScriptureRequest>, JsonRejection>,
) -> Result<Json<ScriptureResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    let scripture = guidance::find_scripture_for_prayer(
        &state.provider,
        request.content.as_deref(),
        request.prayer_type.as_deref(),
    )
    .await?;
    Ok(Json(scripture))
}

fn parse_filter(query: &PrayerQuery) -> Result<PrayerFilter, ApiError> {
    Ok(query.prayer_type.as_deref().unwrap_or("all").parse()?)
}

async fn list_prayers(
    State(state): State<AppState>,
    Query(query): Query<PrayerQuery>,
) -> Result<Json<PrayerList>, ApiError> {
    let filter = parse_filter(&query)?;
    let now = Utc::now();
    let (prayers, stats) = state.wall.snapshot(filter).await;
    let prayers: Vec<PrayerView> = prayers.iter().map(|p| p.view_at(now)).collect();
    Ok(Json(PrayerList { prayers, stats }))
}

async fn create_prayer(
    State(state): State<AppState>,
    payload: Result<Json<ScriptureRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PrayerView>), ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    let (content, prayer_type) = match (request.content.as_deref(), request.prayer_type.as_deref()) {
        (Some(c), Some(t)) if !c.trim().is_empty() && !t.is_empty() => (c, t.parse::<PrayerType>()?),
        _ => {
            return Err(ApiError::BadRequest(
                "Please select a prayer type and enter your prayer.".to_string(),
            ))
        }
    };
    crate::prayer::validate_content(content)?;

    let scripture = match guidance::find_scripture_for_prayer(
        &state.provider,
        Some(content),
        Some(prayer_type.key()),
    )
    .await
    {
        Ok(scripture) => scripture,
        Err(GuidanceError::Upstream(e)) => {
            warn!(error = %e, %prayer_type, "Provider unavailable, using curated scripture");
            curated_scripture(prayer_type)
        }
        Err(e) => return Err(e.into()),
    };

    let now = Utc::now();
    let prayer = state
        .wall
        .add(prayer_type, content, Some(scripture), now)
        .await?;
    info!(id = prayer.id, %prayer_type, "Prayer shared");
    Ok((StatusCode::CREATED, Json(prayer.view_at(now))))
}

async fn like_prayer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PrayerView>, ApiError> {
    let prayer = state.wall.like(id).await?;
    Ok(Json(prayer.view_at(Utc::now())))
}

async fn unlike_prayer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PrayerView>, ApiError> {
    let prayer = state.wall.unlike(id).await?;
    Ok(Json(prayer.view_at(Utc::now())))
}

fn prayer_type_catalogue() -> Vec<PrayerTypeInfo> {
    PrayerType::ALL
        .iter()
        .map(|t| PrayerTypeInfo {
            value: t.key().to_string(),
            label: t.label().to_string(),
            placeholder: t.placeholder().to_string(),
        })
        .collect()
}

async fn prayer_types() -> Json<Vec<PrayerTypeInfo>> {
    Json(prayer_type_catalogue())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<PrayerQuery>,
) -> Result<Html<String>, ApiError> {
    let filter = parse_filter(&query)?;
    let now = Utc::now();
    let (prayers, stats) = state.wall.snapshot(filter).await;
    let prayers: Vec<PrayerView> = prayers.iter().map(|p| p.view_at(now)).collect();
    let filter_key = match filter {
        PrayerFilter::All => "all",
        PrayerFilter::Only(t) => t.key(),
    };

    let tmpl = state.templates.get_template("index.html")?;
    let html = tmpl.render(minijinja::context! {
        title => "WWJD - Prayer Wall",
        filter => filter_key,
        prayers => prayers,
        stats => stats,
        prayer_types => prayer_type_catalogue(),
    })?;
    Ok(Html(html))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health))
        .route(
            "/api/guidance",
            post(guidance_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/scripture",
            post(scripture_handler).fallback(method_not_allowed),
        )
        .route("/api/prayers", get(list_prayers).post(create_prayer))
        .route(
            "/api/prayers/:id/like",
            post(like_prayer).delete(unlike_prayer),
        )
        .route("/api/prayer-types", get(prayer_types))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())) // Add request logging
}

pub async fn start_web_server(host: &str, port: u16, provider: ProviderConfig) -> Result<()> {
    provider.validate().context("Invalid provider configuration")?;
    let client = AnthropicClient::new(provider).context("Failed to build Anthropic client")?;
    info!(model = client.model(), "Anthropic client ready");

    let state = AppState::new(client, PrayerWall::seeded(Utc::now()))?;
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context(format!("Invalid listen address {}:{}", host, port))?;

    // Bind using tokio::net::TcpListener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;
    info!("Web server listening on http://{}", addr);

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, initiating shutdown...");
}
