//! DTOs de la capa de rutas para CDEK
//!
//! Requests de entrada de la API propia. La validación aquí es de forma
//! (campos presentes, no vacíos); la lógica de protocolo vive en el cliente.

use serde::Deserialize;
use validator::Validate;

use crate::models::cdek::{QuoteLocation, QuotePackage};

/// Query de búsqueda de localidades
#[derive(Debug, Deserialize, Validate)]
pub struct SearchLocationsQuery {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_country_code() -> String {
    "RU".to_string()
}

fn default_limit() -> u32 {
    10
}

/// Body de cotización de todas las tarifas
#[derive(Debug, Deserialize)]
pub struct QuoteAllTariffsRequest {
    pub from_location: QuoteLocation,
    pub to_location: QuoteLocation,
    #[serde(default)]
    pub packages: Vec<QuotePackage>,
}

/// Query del listado de tarifas
#[derive(Debug, Deserialize)]
pub struct ListTariffsQuery {
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "rus".to_string()
}
