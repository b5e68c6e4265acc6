//! Sistema de manejo de errores
//!
//! Este módulo define los errores del cliente CDEK y los errores de la
//! aplicación, junto con su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores del cliente CDEK
///
/// `Configuration` y `Validation` se detectan localmente antes de cualquier
/// llamada de red; `Authentication` y `Api` transportan la respuesta del
/// carrier sin modificar.
#[derive(Error, Debug)]
pub enum CdekError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication rejected by CDEK (HTTP {status}): {body}")]
    Authentication {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("CDEK API error (HTTP {status})")]
    Api {
        status: reqwest::StatusCode,
        payload: serde_json::Value,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Carrier error: {0}")]
    Cdek(#[from] CdekError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Cdek(e) => cdek_error_response(e),

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Mapear un error del cliente CDEK a una respuesta HTTP
///
/// Los errores del carrier (autenticación, API, red) se exponen como 502:
/// el fallo es del upstream, no del caller. Solo la validación local es 400.
fn cdek_error_response(error: CdekError) -> (StatusCode, ErrorResponse) {
    match error {
        CdekError::Validation(msg) => {
            eprintln!("CDEK validation error: {}", msg);
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: msg,
                    details: None,
                    code: Some("VALIDATION_ERROR".to_string()),
                },
            )
        }

        CdekError::Configuration(msg) => {
            eprintln!("CDEK configuration error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Configuration Error".to_string(),
                    message: "The carrier client is misconfigured".to_string(),
                    details: Some(json!({ "configuration_error": msg })),
                    code: Some("CONFIGURATION_ERROR".to_string()),
                },
            )
        }

        CdekError::Authentication { status, body } => {
            eprintln!("CDEK authentication rejected: HTTP {}", status);
            (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Carrier Authentication Error".to_string(),
                    message: "CDEK rejected the configured credentials".to_string(),
                    details: Some(json!({
                        "upstream_status": status.as_u16(),
                        "upstream_body": body,
                    })),
                    code: Some("CARRIER_AUTH_ERROR".to_string()),
                },
            )
        }

        CdekError::Api { status, payload } => {
            eprintln!("CDEK API error: HTTP {}", status);
            (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Carrier API Error".to_string(),
                    message: "CDEK returned an error response".to_string(),
                    details: Some(json!({
                        "upstream_status": status.as_u16(),
                        "upstream_payload": payload,
                    })),
                    code: Some("CARRIER_API_ERROR".to_string()),
                },
            )
        }

        CdekError::Network(e) => {
            eprintln!("CDEK network error: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Carrier Network Error".to_string(),
                    message: "Could not reach the CDEK API".to_string(),
                    details: Some(json!({ "network_error": e.to_string() })),
                    code: Some("CARRIER_NETWORK_ERROR".to_string()),
                },
            )
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
