//! Modelos para el API de CDEK
//!
//! Este módulo contiene las estructuras que describen lo que entra y sale
//! del cliente CDEK. Los códigos de localidad y puntos de retiro llegan
//! como `serde_json::Value` porque los callers los envían indistintamente
//! como número o string; el cliente los coacciona a string antes de
//! transmitirlos (el carrier rechaza códigos numéricos).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::CdekError;

/// Credenciales del API de CDEK
///
/// Las tres piezas son obligatorias en construcción; su ausencia es un error
/// de configuración fatal, no un error de runtime.
#[derive(Debug, Clone)]
pub struct CdekCredentials {
    pub base_url: String,
    pub account: String,
    pub secure_password: String,
}

impl CdekCredentials {
    pub fn new(
        base_url: impl Into<String>,
        account: impl Into<String>,
        secure_password: impl Into<String>,
    ) -> Result<Self, CdekError> {
        let base_url = base_url.into();
        let account = account.into();
        let secure_password = secure_password.into();

        if base_url.trim().is_empty() {
            return Err(CdekError::Configuration(
                "CDEK base URL must not be empty".to_string(),
            ));
        }
        if account.trim().is_empty() {
            return Err(CdekError::Configuration(
                "CDEK account must not be empty".to_string(),
            ));
        }
        if secure_password.trim().is_empty() {
            return Err(CdekError::Configuration(
                "CDEK secure password must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            account: account.trim().to_string(),
            secure_password: secure_password.trim().to_string(),
        })
    }
}

/// Localidad de origen o destino de un envío
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLocation {
    /// Código de localidad asignado por CDEK (número o string)
    #[serde(default)]
    pub code: Option<Value>,
    /// Dirección en texto libre, opcional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Paquete físico para cotizaciones
///
/// Peso en gramos, lados en centímetros. Todos obligatorios y numéricos;
/// el cliente valida antes de cualquier llamada de red.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotePackage {
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
}

/// Servicio adicional aplicado a una cotización de tarifa única
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffService {
    pub code: Value,
    #[serde(default)]
    pub parameter: Option<Value>,
}

/// Parámetros de la cotización de una tarifa concreta
#[derive(Debug, Clone, Deserialize)]
pub struct SingleTariffQuote {
    pub tariff_code: i64,
    pub from_location: QuoteLocation,
    pub to_location: QuoteLocation,
    #[serde(default)]
    pub packages: Vec<QuotePackage>,
    #[serde(default)]
    pub services: Option<Vec<TariffService>>,
    /// Código del punto de retiro de origen (número o string)
    #[serde(default)]
    pub shipment_point: Option<Value>,
    /// Código del punto de retiro de destino (número o string)
    #[serde(default)]
    pub delivery_point: Option<Value>,
    /// Timestamp ISO-8601; si falta se genera con la hora local actual
    #[serde(default)]
    pub date: Option<String>,
    /// Código numérico de moneda, 1 (RUB) por defecto
    #[serde(default)]
    pub currency: Option<i64>,
}

/// Destinatario de una orden
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRecipient {
    #[serde(default)]
    pub name: Option<String>,
    /// Teléfonos como strings sueltos u objetos `{"number": ...}`
    #[serde(default)]
    pub phones: Vec<Value>,
}

/// Paquete de una orden, con ítems de contenido opcionales
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPackage {
    /// Identificador del paquete; se sintetiza `PACK-<n>` si falta
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
    /// Ítems de contenido tal como los espera CDEK, sin transformar
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

/// Parámetros de creación de una orden
///
/// Exactamente una forma de destino es obligatoria: `delivery_point` o
/// `to_location`; si llegan ambas, `delivery_point` tiene precedencia.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    /// Tipo de orden CDEK (1 = internet-shop, 2 = delivery)
    #[serde(rename = "type", default = "default_order_type")]
    pub order_type: i64,
    /// Número único de orden asignado por el caller
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub tariff_code: Option<i64>,
    #[serde(default)]
    pub shipment_point: Option<Value>,
    #[serde(default)]
    pub delivery_point: Option<Value>,
    #[serde(default)]
    pub to_location: Option<QuoteLocation>,
    #[serde(default)]
    pub recipient: OrderRecipient,
    #[serde(default)]
    pub packages: Vec<OrderPackage>,
}

fn default_order_type() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_all_three_pieces() {
        assert!(CdekCredentials::new("", "account", "secret").is_err());
        assert!(CdekCredentials::new("https://api.cdek.ru", "", "secret").is_err());
        assert!(CdekCredentials::new("https://api.cdek.ru", "account", "  ").is_err());
        assert!(CdekCredentials::new("https://api.cdek.ru", "account", "secret").is_ok());
    }

    #[test]
    fn test_credentials_trim_trailing_slash() {
        let credentials =
            CdekCredentials::new("https://api.cdek.ru/", "account", "secret").unwrap();
        assert_eq!(credentials.base_url, "https://api.cdek.ru");
    }
}
