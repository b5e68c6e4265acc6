//! Utilidades de validación y coerción
//!
//! Este módulo contiene funciones helper para validar y normalizar los
//! valores que viajan hacia el API de CDEK: dimensiones numéricas, códigos
//! de localidad (el carrier los exige como string), direcciones y teléfonos.

use serde_json::{json, Value};

use crate::utils::errors::CdekError;

/// Parsear una dimensión física (peso en gramos, lados en centímetros)
///
/// Acepta números JSON o strings numéricos. Valores ausentes, no numéricos
/// o no finitos son un error de validación, nunca se coaccionan a cero.
pub fn parse_dimension(field: &str, value: Option<&Value>) -> Result<f64, CdekError> {
    let value = value.ok_or_else(|| {
        CdekError::Validation(format!("package field '{}' is required", field))
    })?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(CdekError::Validation(format!(
            "package field '{}' must be a finite number, got {}",
            field, value
        ))),
    }
}

/// Coaccionar un código de localidad a string
///
/// CDEK rechaza códigos numéricos en `from_location.code` / `to_location.code`
/// aunque lógicamente sean enteros.
pub fn location_code_as_string(field: &str, value: Option<&Value>) -> Result<String, CdekError> {
    let value = value.ok_or_else(|| {
        CdekError::Validation(format!("location field '{}' is required", field))
    })?;

    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(CdekError::Validation(format!(
            "location field '{}' must be a numeric code, got {}",
            field, value
        ))),
    }
}

/// Coaccionar un código de punto de retiro (PVZ) a string, si está presente
pub fn pickup_point_as_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Formatear una dirección libre para CDEK
///
/// Heurística: un valor sin coma es un nombre de ciudad a secas y recibe el
/// marcador de localidad; un valor con coma ya es una dirección completa y
/// pasa sin cambios.
pub fn format_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.contains(',') {
        trimmed.to_string()
    } else {
        format!("г. {}", trimmed)
    }
}

/// Normalizar teléfonos del destinatario a la forma `[{"number": ...}]`
///
/// Acepta strings sueltos u objetos que ya traen un campo `number`.
pub fn normalize_phones(phones: &[Value]) -> Result<Vec<Value>, CdekError> {
    phones
        .iter()
        .map(|phone| match phone {
            Value::String(s) if !s.trim().is_empty() => {
                Ok(json!({ "number": s.trim() }))
            }
            Value::Object(obj) => match obj.get("number") {
                Some(Value::String(s)) if !s.trim().is_empty() => {
                    Ok(json!({ "number": s.trim() }))
                }
                Some(Value::Number(n)) => Ok(json!({ "number": n.to_string() })),
                _ => Err(CdekError::Validation(format!(
                    "recipient phone object without a usable 'number' field: {}",
                    phone
                ))),
            },
            _ => Err(CdekError::Validation(format!(
                "recipient phone must be a string or an object with 'number', got {}",
                phone
            ))),
        })
        .collect()
}
