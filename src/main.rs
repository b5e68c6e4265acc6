use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use delivery_cdek::api;
use delivery_cdek::config::environment::EnvironmentConfig;
use delivery_cdek::middleware::cors::cors_middleware;
use delivery_cdek::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    let config = EnvironmentConfig::default();
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚚 Delivery CDEK Gateway - API v2 de CDEK");
    info!("==========================================");

    // Construir el estado con el cliente CDEK
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error configurando el cliente CDEK: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .merge(api::create_api_router())
        .layer(cors_middleware(&config.cors_origins))
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📦 Endpoints CDEK:");
    info!("   GET  /api/cdek/locations - Buscar localidades");
    info!("   GET  /api/cdek/deliverypoints - Puntos de retiro por ciudad");
    info!("   POST /api/cdek/calculator/tarifflist - Cotizar todas las tarifas");
    info!("   POST /api/cdek/calculator/tariff - Cotizar una tarifa");
    info!("   GET  /api/cdek/tariffs - Listar tarifas disponibles");
    info!("   POST /api/cdek/orders - Crear orden de envío");
    info!("   POST /api/cdek/token/reset - Invalidar token cacheado");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡Delivery CDEK Gateway funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
