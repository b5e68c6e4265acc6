//! API de CDEK - handlers HTTP
//!
//! Este módulo contiene los handlers delgados sobre el cliente CDEK: validan
//! la forma del request, llaman al cliente y envuelven el resultado. Toda la
//! lógica de protocolo del carrier vive en `clients::cdek_client`.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::dto::cdek_dto::{ListTariffsQuery, QuoteAllTariffsRequest, SearchLocationsQuery};
use crate::models::cdek::{CreateOrder, SingleTariffQuote};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};

/// Crear el router de CDEK
pub fn create_cdek_router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(search_locations))
        .route("/deliverypoints", get(list_pickup_points))
        .route("/calculator/tarifflist", post(quote_all_tariffs))
        .route("/calculator/tariff", post(quote_single_tariff))
        .route("/tariffs", get(list_tariffs))
        .route("/orders", post(create_order))
        .route("/token/reset", post(reset_token))
}

/// GET /api/cdek/locations - Buscar localidades por nombre
async fn search_locations(
    State(state): State<AppState>,
    Query(query): Query<SearchLocationsQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let locations = state
        .cdek
        .search_locations(&query.name, &query.country_code, query.limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "locations": locations,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// GET /api/cdek/deliverypoints - Puntos de retiro de una ciudad
///
/// `city_code` es obligatorio; el resto de los query params pasan como
/// filtros al carrier.
async fn list_pickup_points(
    State(state): State<AppState>,
    Query(mut query): Query<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    let city_code = query
        .remove("city_code")
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| bad_request_error("query param 'city_code' is required"))?;

    let mut filters = Map::new();
    for (key, value) in query {
        filters.insert(key, Value::String(value));
    }

    let points = state.cdek.list_pickup_points(&city_code, &filters).await?;

    Ok(Json(json!({
        "success": true,
        "deliverypoints": points,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/cdek/calculator/tarifflist - Cotizar todas las tarifas
async fn quote_all_tariffs(
    State(state): State<AppState>,
    Json(request): Json<QuoteAllTariffsRequest>,
) -> AppResult<Json<Value>> {
    let quote = state
        .cdek
        .quote_all_tariffs(&request.from_location, &request.to_location, &request.packages)
        .await?;

    Ok(Json(json!({
        "success": true,
        "quote": quote,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/cdek/calculator/tariff - Cotizar una tarifa concreta
async fn quote_single_tariff(
    State(state): State<AppState>,
    Json(request): Json<SingleTariffQuote>,
) -> AppResult<Json<Value>> {
    let quote = state.cdek.quote_single_tariff(&request).await?;

    Ok(Json(json!({
        "success": true,
        "quote": quote,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// GET /api/cdek/tariffs - Listar tarifas disponibles
async fn list_tariffs(
    State(state): State<AppState>,
    Query(query): Query<ListTariffsQuery>,
) -> AppResult<Json<Value>> {
    let tariffs = state.cdek.list_tariffs(&query.lang).await?;

    Ok(Json(json!({
        "success": true,
        "tariffs": tariffs,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/cdek/orders - Crear una orden de envío
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrder>,
) -> AppResult<Json<Value>> {
    let order = state.cdek.create_order(&request).await?;

    log::info!("📦 Orden creada en CDEK: {:?}", request.number);

    Ok(Json(json!({
        "success": true,
        "order": order,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/cdek/token/reset - Invalidar el token cacheado
async fn reset_token(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.cdek.tokens().reset_token().await;

    Ok(Json(json!({
        "success": true,
        "message": "CDEK token invalidated",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
