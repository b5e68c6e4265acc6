//! API endpoints
//!
//! Este módulo contiene los endpoints de la API.

pub mod cdek;

use axum::Router;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/api/cdek", cdek::create_cdek_router())
}
