/*!
 * Route handlers of the HTTP boundary.
 */

use axum::extract::{RawQuery, State};
use axum::Json;
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::query::parse_translate_query;
use super::responses::ApiError;
use super::AppState;
use crate::database::CacheStats;
use crate::language_utils::language_name;
use crate::translation::{truncate_text, ServiceStatsSnapshot, TranslationResult};

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the store answers, `degraded` otherwise
    pub status: &'static str,
    /// `connected` or `disconnected`
    pub database: &'static str,
    pub deepl_configured: bool,
    pub backend: &'static str,
}

/// One supported language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: Option<String>,
}

/// Body of `GET /api/languages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub languages: Vec<LanguageEntry>,
}

/// Body of `GET /api/cache/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub backend: &'static str,
    pub cache: CacheStats,
    pub service: ServiceStatsSnapshot,
}

/// GET /: service information
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "LingoCache translation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/translate": "GET - Translate text with cached results",
            "/api/health": "GET - Health check endpoint",
            "/api/languages": "GET - Supported target languages",
            "/api/cache/stats": "GET - Cache statistics",
        }
    }))
}

/// GET /api/translate?text=&target_lang=
pub async fn translate(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<TranslationResult>, ApiError> {
    let request = parse_translate_query(query.as_deref()).map_err(ApiError::Validation)?;
    let (text, target_lang) = state
        .service
        .validate_request(&request)
        .map_err(ApiError::Validation)?;

    info!(
        "Translation request: text='{}', target_lang='{}'",
        truncate_text(&text, 60),
        target_lang
    );

    let result = state.service.get_translation(&text, &target_lang).await?;
    Ok(Json(result))
}

/// GET /api/health: store connectivity and provider credential
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let connected = state.service.store_connected().await;

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" },
        database: if connected { "connected" } else { "disconnected" },
        deepl_configured: state.service.provider().is_configured(),
        backend: state.service.store().backend_name(),
    })
}

/// GET /api/languages
pub async fn languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    let languages = state
        .service
        .languages()
        .iter()
        .map(|code| LanguageEntry {
            code: code.to_string(),
            name: language_name(code),
        })
        .collect();

    Json(LanguagesResponse {
        default: state.service.default_target_language().to_string(),
        languages,
    })
}

/// GET /api/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let cache = state.service.cache_stats().await?;

    Ok(Json(StatsResponse {
        backend: state.service.store().backend_name(),
        cache,
        service: state.service.stats(),
    }))
}
