//! Cliente HTTP para el API v2 de CDEK
//!
//! Este módulo contiene el cliente del carrier: construye los cuerpos que
//! CDEK espera, adjunta el token bearer cacheado y normaliza las
//! respuestas. Las rutas nunca hablan con CDEK directamente; reciben y
//! entregan valores planos a través de este cliente.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::models::cdek::{
    CdekCredentials, CreateOrder, OrderPackage, QuoteLocation, QuotePackage, SingleTariffQuote,
};
use crate::services::token_service::CdekTokenService;
use crate::utils::errors::CdekError;
use crate::utils::validation::{
    format_address, location_code_as_string, normalize_phones, parse_dimension,
    pickup_point_as_string,
};

/// Idioma fijo de respuesta del carrier
const RESPONSE_LANG: &str = "rus";

/// Código numérico de moneda por defecto (RUB)
const DEFAULT_CURRENCY: i64 = 1;

/// Tarifas almacén-almacén: requieren punto de retiro en ambos extremos
const WAREHOUSE_TO_WAREHOUSE_TARIFFS: [i64; 4] = [62, 63, 136, 234];

/// Ciudades por defecto del fallback de listado de tarifas
const FALLBACK_FROM_CITY: i64 = 44; // Москва
const FALLBACK_TO_CITY: i64 = 137; // Санкт-Петербург

/// Paquete de referencia del fallback: 1 kg, 10×10×10 cm
const FALLBACK_PACKAGE_WEIGHT: i64 = 1000;
const FALLBACK_PACKAGE_SIDE: i64 = 10;

/// Cliente del API de CDEK
///
/// El cache de tokens vive dentro del cliente como instancia propia; clonar
/// el cliente comparte el mismo slot de token.
#[derive(Clone)]
pub struct CdekClient {
    http: Client,
    credentials: CdekCredentials,
    tokens: CdekTokenService,
}

impl CdekClient {
    /// Crear un cliente nuevo con credenciales ya validadas
    pub fn new(credentials: CdekCredentials) -> Result<Self, CdekError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let tokens = CdekTokenService::new(http.clone(), credentials.clone());

        Ok(Self {
            http,
            credentials,
            tokens,
        })
    }

    /// Acceso al servicio de tokens (para invalidación explícita)
    pub fn tokens(&self) -> &CdekTokenService {
        &self.tokens
    }

    /// Primitiva genérica de request contra CDEK
    ///
    /// Adjunta `Authorization: Bearer` y `Content-Type: application/json`;
    /// los headers del caller tienen precedencia. En status no exitoso el
    /// cuerpo de error se parsea como JSON o se envuelve como
    /// `{"message": <texto crudo>}`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(String, String)]>,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> Result<Value, CdekError> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.credentials.base_url, path);
        let request_id = Uuid::new_v4();
        log::debug!("➡️ [{}] {} {}", request_id, method, url);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        let response = request.send().await?;
        let status = response.status();
        log::debug!("⬅️ [{}] HTTP {} desde CDEK", request_id, status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let payload = serde_json::from_str::<Value>(&raw)
                .unwrap_or_else(|_| json!({ "message": raw }));
            return Err(CdekError::Api { status, payload });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Buscar localidades por nombre
    ///
    /// El caller valida que `name` no esté vacío antes de llamar; el
    /// cliente no re-valida.
    pub async fn search_locations(
        &self,
        name: &str,
        country_code: &str,
        limit: u32,
    ) -> Result<Value, CdekError> {
        let query = vec![
            ("name".to_string(), name.to_string()),
            ("country_code".to_string(), country_code.to_string()),
            ("size".to_string(), limit.to_string()),
            ("lang".to_string(), RESPONSE_LANG.to_string()),
        ];

        self.request(Method::GET, "/v2/location/cities", Some(&query), None, None)
            .await
    }

    /// Listar puntos de retiro de una ciudad
    ///
    /// Los filtros del caller se aplanan como query params, todos
    /// stringificados.
    pub async fn list_pickup_points(
        &self,
        city_code: &str,
        filters: &Map<String, Value>,
    ) -> Result<Value, CdekError> {
        let mut query = vec![("city_code".to_string(), city_code.to_string())];
        for (key, value) in filters {
            let as_string = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            query.push((key.clone(), as_string));
        }

        self.request(Method::GET, "/v2/deliverypoints", Some(&query), None, None)
            .await
    }

    /// Cotizar todas las tarifas disponibles entre dos localidades
    ///
    /// Devuelve el array de tarifas más los errores/warnings que reporte el
    /// carrier, sin modificar.
    pub async fn quote_all_tariffs(
        &self,
        from: &QuoteLocation,
        to: &QuoteLocation,
        packages: &[QuotePackage],
    ) -> Result<Value, CdekError> {
        let body = build_tarifflist_body(from, to, packages)?;

        self.request(
            Method::POST,
            "/v2/calculator/tarifflist",
            None,
            Some(&body),
            None,
        )
        .await
    }

    /// Cotizar una tarifa concreta
    ///
    /// Para tarifas almacén-almacén sin punto de retiro indicado se intenta
    /// el autodescubrimiento best-effort; si sigue faltando, la llamada
    /// posterior falla por sí sola con el error natural del carrier.
    pub async fn quote_single_tariff(
        &self,
        params: &SingleTariffQuote,
    ) -> Result<Value, CdekError> {
        let from_code =
            location_code_as_string("from_location.code", params.from_location.code.as_ref())?;
        let to_code =
            location_code_as_string("to_location.code", params.to_location.code.as_ref())?;
        // Los paquetes se validan antes del autodescubrimiento: ningún dato
        // inválido debe llegar a disparar llamadas de red
        let packages = build_quote_packages(&params.packages)?;

        let mut shipment_point = pickup_point_as_string(params.shipment_point.as_ref());
        let mut delivery_point = pickup_point_as_string(params.delivery_point.as_ref());

        if WAREHOUSE_TO_WAREHOUSE_TARIFFS.contains(&params.tariff_code) {
            if shipment_point.is_none() {
                shipment_point = self.discover_pickup_point(&from_code).await;
            }
            if delivery_point.is_none() {
                delivery_point = self.discover_pickup_point(&to_code).await;
            }
        }

        let body = build_single_tariff_body(
            params,
            &from_code,
            &to_code,
            packages,
            shipment_point.as_deref(),
            delivery_point.as_deref(),
        );

        self.request(Method::POST, "/v2/calculator/tariff", None, Some(&body), None)
            .await
    }

    /// Listar las tarifas que el contrato tiene disponibles
    ///
    /// El endpoint dedicado no existe en todos los entornos de CDEK: un 404
    /// dispara el fallback vía cotización completa entre las ciudades por
    /// defecto. Cualquier otro fallo propaga sin cambios.
    pub async fn list_tariffs(&self, lang: &str) -> Result<Value, CdekError> {
        let query = vec![("lang".to_string(), lang.to_string())];

        match self
            .request(Method::GET, "/v2/calculator/tariffs", Some(&query), None, None)
            .await
        {
            Ok(tariffs) => Ok(tariffs),
            Err(CdekError::Api { status, .. }) if status == StatusCode::NOT_FOUND => {
                self.list_tariffs_via_quote().await
            }
            Err(e) => Err(e),
        }
    }

    /// Crear una orden de envío
    pub async fn create_order(&self, params: &CreateOrder) -> Result<Value, CdekError> {
        let body = build_order_body(params)?;

        self.request(Method::POST, "/v2/orders", None, Some(&body), None)
            .await
    }

    /// Descubrimiento best-effort de un punto de retiro estándar (PVZ)
    ///
    /// Prefiere un punto con manejo de carga consolidada (LTL); si no hay,
    /// cae al primero de la lista. Los fallos se registran y se absorben.
    async fn discover_pickup_point(&self, city_code: &str) -> Option<String> {
        let mut filters = Map::new();
        filters.insert("type".to_string(), json!("PVZ"));

        let points = match self.list_pickup_points(city_code, &filters).await {
            Ok(Value::Array(points)) => points,
            Ok(other) => {
                log::warn!(
                    "⚠️ Respuesta inesperada al buscar PVZ en {}: {}",
                    city_code,
                    other
                );
                return None;
            }
            Err(e) => {
                log::warn!("⚠️ Falló el descubrimiento de PVZ en {}: {}", city_code, e);
                return None;
            }
        };

        let chosen = points
            .iter()
            .find(|point| {
                point
                    .get("is_ltl")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .or_else(|| points.first())?;

        let code = chosen
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(code) = &code {
            log::info!("📦 PVZ autodescubierto en {}: {}", city_code, code);
        }
        code
    }

    /// Fallback del listado de tarifas vía cotización Москва → Санкт-Петербург
    async fn list_tariffs_via_quote(&self) -> Result<Value, CdekError> {
        log::warn!(
            "⚠️ Endpoint de tarifas no disponible (404), usando fallback vía cotización {} -> {}",
            FALLBACK_FROM_CITY,
            FALLBACK_TO_CITY
        );

        let from = QuoteLocation {
            code: Some(json!(FALLBACK_FROM_CITY)),
            address: None,
        };
        let to = QuoteLocation {
            code: Some(json!(FALLBACK_TO_CITY)),
            address: None,
        };
        let packages = vec![QuotePackage {
            weight: Some(json!(FALLBACK_PACKAGE_WEIGHT)),
            length: Some(json!(FALLBACK_PACKAGE_SIDE)),
            width: Some(json!(FALLBACK_PACKAGE_SIDE)),
            height: Some(json!(FALLBACK_PACKAGE_SIDE)),
        }];

        let quote = self.quote_all_tariffs(&from, &to, &packages).await?;
        let tariffs = dedupe_quoted_tariffs(&quote);
        log::info!("✅ Fallback de tarifas: {} tarifas distintas", tariffs.len());

        Ok(Value::Array(tariffs))
    }
}

/// Cuerpo mínimo del endpoint tarifflist: solo códigos y paquetes
///
/// Las direcciones se omiten en este cuerpo: el contrato mínimo del carrier
/// lleva únicamente códigos y paquetes, y combinadas con ciertas tarifas
/// provocan rechazo.
fn build_tarifflist_body(
    from: &QuoteLocation,
    to: &QuoteLocation,
    packages: &[QuotePackage],
) -> Result<Value, CdekError> {
    Ok(json!({
        "from_location": {
            "code": location_code_as_string("from_location.code", from.code.as_ref())?,
        },
        "to_location": {
            "code": location_code_as_string("to_location.code", to.code.as_ref())?,
        },
        "packages": build_quote_packages(packages)?,
    }))
}

/// Cuerpo completo del endpoint de tarifa única
fn build_single_tariff_body(
    params: &SingleTariffQuote,
    from_code: &str,
    to_code: &str,
    packages: Vec<Value>,
    shipment_point: Option<&str>,
    delivery_point: Option<&str>,
) -> Value {
    let mut body = json!({
        "tariff_code": params.tariff_code,
        "date": quote_timestamp(params.date.as_deref()),
        "currency": params.currency.unwrap_or(DEFAULT_CURRENCY),
        "lang": RESPONSE_LANG,
        "from_location": location_body(from_code, params.from_location.address.as_deref()),
        "to_location": location_body(to_code, params.to_location.address.as_deref()),
        "packages": packages,
    });

    if let Some(services) = &params.services {
        let reduced: Vec<Value> = services
            .iter()
            .map(|service| {
                let mut entry = json!({ "code": service.code });
                if let Some(parameter) = &service.parameter {
                    entry["parameter"] = parameter.clone();
                }
                entry
            })
            .collect();
        body["services"] = Value::Array(reduced);
    }
    if let Some(point) = shipment_point {
        body["shipment_point"] = json!(point);
    }
    if let Some(point) = delivery_point {
        body["delivery_point"] = json!(point);
    }

    body
}

/// Cuerpo de creación de orden, con validación local previa a la red
fn build_order_body(params: &CreateOrder) -> Result<Value, CdekError> {
    let number = params
        .number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CdekError::Validation("order 'number' is required".to_string()))?;
    let tariff_code = params
        .tariff_code
        .ok_or_else(|| CdekError::Validation("order 'tariff_code' is required".to_string()))?;
    let recipient_name = params
        .recipient
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            CdekError::Validation("order 'recipient.name' is required".to_string())
        })?;
    if params.packages.is_empty() {
        return Err(CdekError::Validation(
            "order requires at least one package".to_string(),
        ));
    }

    let phones = normalize_phones(&params.recipient.phones)?;

    let mut body = json!({
        "type": params.order_type,
        "number": number,
        "tariff_code": tariff_code,
        "recipient": {
            "name": recipient_name,
            "phones": phones,
        },
        "packages": build_order_packages(&params.packages)?,
    });

    if let Some(point) = pickup_point_as_string(params.shipment_point.as_ref()) {
        body["shipment_point"] = json!(point);
    }

    // delivery_point tiene precedencia cuando llegan ambas formas de destino
    if let Some(point) = pickup_point_as_string(params.delivery_point.as_ref()) {
        body["delivery_point"] = json!(point);
    } else if let Some(to_location) = params.to_location.as_ref().filter(|l| l.code.is_some()) {
        let code = location_code_as_string("to_location.code", to_location.code.as_ref())?;
        body["to_location"] = location_body(&code, to_location.address.as_deref());
    } else {
        return Err(CdekError::Validation(
            "order requires a destination: either 'delivery_point' or 'to_location'".to_string(),
        ));
    }

    Ok(body)
}

/// Validar y convertir los paquetes de cotización a números
fn build_quote_packages(packages: &[QuotePackage]) -> Result<Vec<Value>, CdekError> {
    packages
        .iter()
        .map(|pkg| {
            Ok(json!({
                "weight": parse_dimension("weight", pkg.weight.as_ref())?,
                "length": parse_dimension("length", pkg.length.as_ref())?,
                "width": parse_dimension("width", pkg.width.as_ref())?,
                "height": parse_dimension("height", pkg.height.as_ref())?,
            }))
        })
        .collect()
}

/// Construir los paquetes de una orden, sintetizando `PACK-<n>` si falta el
/// identificador
fn build_order_packages(packages: &[OrderPackage]) -> Result<Vec<Value>, CdekError> {
    packages
        .iter()
        .enumerate()
        .map(|(index, pkg)| {
            let number = pkg
                .number
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("PACK-{}", index + 1));

            let mut entry = json!({
                "number": number,
                "weight": parse_dimension("weight", pkg.weight.as_ref())?,
            });
            for (field, value) in [
                ("length", &pkg.length),
                ("width", &pkg.width),
                ("height", &pkg.height),
            ] {
                if value.is_some() {
                    entry[field] = json!(parse_dimension(field, value.as_ref())?);
                }
            }
            if let Some(items) = &pkg.items {
                entry["items"] = json!(items);
            }

            Ok(entry)
        })
        .collect()
}

/// Localidad con código string y dirección formateada solo si viene con
/// contenido
fn location_body(code: &str, address: Option<&str>) -> Value {
    let mut location = json!({ "code": code });
    if let Some(address) = address {
        if !address.trim().is_empty() {
            location["address"] = json!(format_address(address));
        }
    }
    location
}

/// Timestamp ISO-8601 con offset UTC explícito
///
/// Sin valor del caller se usa la hora local actual; un valor provisto
/// pierde su fracción de subsegundos.
fn quote_timestamp(supplied: Option<&str>) -> String {
    match supplied {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
    }
}

/// Extraer y de-duplicar las tarifas de una respuesta de tarifflist
fn dedupe_quoted_tariffs(quote: &Value) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut tariffs = Vec::new();

    if let Some(codes) = quote.get("tariff_codes").and_then(Value::as_array) {
        for tariff in codes {
            let Some(code) = tariff.get("tariff_code").and_then(Value::as_i64) else {
                continue;
            };
            if !seen.insert(code) {
                continue;
            }
            tariffs.push(json!({
                "tariff_code": code,
                "tariff_name": tariff.get("tariff_name").cloned().unwrap_or(Value::Null),
                "tariff_description": tariff
                    .get("tariff_description")
                    .cloned()
                    .unwrap_or(Value::Null),
                "delivery_mode": tariff.get("delivery_mode").cloned().unwrap_or(Value::Null),
            }));
        }
    }

    tariffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cdek::{OrderRecipient, TariffService};

    fn test_packages() -> Vec<QuotePackage> {
        vec![QuotePackage {
            weight: Some(json!(1000)),
            length: Some(json!("25")),
            width: Some(json!(15)),
            height: Some(json!(10)),
        }]
    }

    fn test_location(code: Value) -> QuoteLocation {
        QuoteLocation {
            code: Some(code),
            address: None,
        }
    }

    #[test]
    fn test_tarifflist_body_encodes_codes_as_strings() {
        let body = build_tarifflist_body(
            &test_location(json!(270)),
            &test_location(json!(44)),
            &test_packages(),
        )
        .unwrap();

        assert_eq!(body["from_location"]["code"], json!("270"));
        assert_eq!(body["to_location"]["code"], json!("44"));
        // Las dimensiones quedan numéricas aunque lleguen como string
        assert_eq!(body["packages"][0]["length"], json!(25.0));
        // Sin direcciones en el cuerpo mínimo
        assert!(body["from_location"].get("address").is_none());
        assert!(body["to_location"].get("address").is_none());
    }

    #[test]
    fn test_tarifflist_body_is_deterministic() {
        let from = test_location(json!(270));
        let to = test_location(json!(44));
        let packages = test_packages();

        let first = build_tarifflist_body(&from, &to, &packages).unwrap();
        let second = build_tarifflist_body(&from, &to, &packages).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_tarifflist_body_rejects_non_numeric_dimension() {
        let packages = vec![QuotePackage {
            weight: Some(json!("heavy")),
            length: Some(json!(10)),
            width: Some(json!(10)),
            height: Some(json!(10)),
        }];
        let result = build_tarifflist_body(
            &test_location(json!(270)),
            &test_location(json!(44)),
            &packages,
        );

        assert!(matches!(result, Err(CdekError::Validation(_))));
    }

    #[test]
    fn test_single_tariff_body_full_shape() {
        let params = SingleTariffQuote {
            tariff_code: 139,
            from_location: QuoteLocation {
                code: Some(json!(270)),
                address: Some("Новосибирск".to_string()),
            },
            to_location: QuoteLocation {
                code: Some(json!(44)),
                address: Some("г. Москва, ул. Ленина 1".to_string()),
            },
            packages: test_packages(),
            services: Some(vec![TariffService {
                code: json!("INSURANCE"),
                parameter: Some(json!(3000)),
            }]),
            shipment_point: None,
            delivery_point: None,
            date: Some("2026-08-07T12:30:45.123456+07:00".to_string()),
            currency: None,
        };

        let packages = build_quote_packages(&params.packages).unwrap();
        let body = build_single_tariff_body(&params, "270", "44", packages, None, None);

        assert_eq!(body["tariff_code"], json!(139));
        assert_eq!(body["currency"], json!(1));
        assert_eq!(body["lang"], json!("rus"));
        // La fracción de subsegundos se elimina, el offset se conserva
        assert_eq!(body["date"], json!("2026-08-07T12:30:45+07:00"));
        // La ciudad a secas recibe el marcador de localidad
        assert_eq!(body["from_location"]["address"], json!("г. Новосибирск"));
        // La dirección completa pasa sin cambios
        assert_eq!(
            body["to_location"]["address"],
            json!("г. Москва, ул. Ленина 1")
        );
        assert_eq!(
            body["services"],
            json!([{ "code": "INSURANCE", "parameter": 3000 }])
        );
        assert!(body.get("shipment_point").is_none());
        assert!(body.get("delivery_point").is_none());
    }

    #[test]
    fn test_single_tariff_body_attaches_points_as_strings() {
        let params = SingleTariffQuote {
            tariff_code: 136,
            from_location: test_location(json!(270)),
            to_location: test_location(json!(44)),
            packages: test_packages(),
            services: None,
            shipment_point: None,
            delivery_point: None,
            date: Some("2026-08-07T12:00:00+03:00".to_string()),
            currency: Some(2),
        };

        let packages = build_quote_packages(&params.packages).unwrap();
        let body =
            build_single_tariff_body(&params, "270", "44", packages, Some("NSK33"), Some("MSK67"));

        assert_eq!(body["shipment_point"], json!("NSK33"));
        assert_eq!(body["delivery_point"], json!("MSK67"));
        assert_eq!(body["currency"], json!(2));
    }

    #[test]
    fn test_quote_timestamp_generated_has_offset_and_no_fraction() {
        let generated = quote_timestamp(None);
        assert!(!generated.contains('.'));
        // Offset explícito del estilo +03:00 / -05:00
        let offset = &generated[generated.len() - 6..];
        assert!(offset.starts_with('+') || offset.starts_with('-'));
        assert_eq!(&offset[3..4], ":");
    }

    #[test]
    fn test_order_body_delivery_point_takes_precedence() {
        let params = CreateOrder {
            order_type: 1,
            number: Some("ORD-1001".to_string()),
            tariff_code: Some(136),
            shipment_point: None,
            delivery_point: Some(json!("MSK123")),
            to_location: Some(test_location(json!(270))),
            recipient: OrderRecipient {
                name: Some("Иван Петров".to_string()),
                phones: vec![json!("+79991234567")],
            },
            packages: vec![OrderPackage {
                number: None,
                weight: Some(json!(500)),
                length: None,
                width: None,
                height: None,
                items: None,
            }],
        };

        let body = build_order_body(&params).unwrap();

        assert_eq!(body["delivery_point"], json!("MSK123"));
        assert!(body.get("to_location").is_none());
    }

    #[test]
    fn test_order_body_requires_a_destination() {
        let params = CreateOrder {
            order_type: 1,
            number: Some("ORD-1002".to_string()),
            tariff_code: Some(139),
            shipment_point: None,
            delivery_point: None,
            to_location: None,
            recipient: OrderRecipient {
                name: Some("Иван Петров".to_string()),
                phones: vec![],
            },
            packages: vec![OrderPackage {
                number: None,
                weight: Some(json!(500)),
                length: None,
                width: None,
                height: None,
                items: None,
            }],
        };

        assert!(matches!(
            build_order_body(&params),
            Err(CdekError::Validation(_))
        ));
    }

    #[test]
    fn test_order_body_validates_required_fields() {
        let base = CreateOrder {
            order_type: 1,
            number: None,
            tariff_code: Some(139),
            shipment_point: None,
            delivery_point: Some(json!("MSK123")),
            to_location: None,
            recipient: OrderRecipient {
                name: Some("Иван Петров".to_string()),
                phones: vec![],
            },
            packages: vec![OrderPackage {
                number: None,
                weight: Some(json!(500)),
                length: None,
                width: None,
                height: None,
                items: None,
            }],
        };
        assert!(matches!(
            build_order_body(&base),
            Err(CdekError::Validation(_))
        ));

        let mut no_packages = base.clone();
        no_packages.number = Some("ORD-1".to_string());
        no_packages.packages = vec![];
        assert!(matches!(
            build_order_body(&no_packages),
            Err(CdekError::Validation(_))
        ));

        let mut no_name = base.clone();
        no_name.number = Some("ORD-1".to_string());
        no_name.recipient.name = None;
        assert!(matches!(
            build_order_body(&no_name),
            Err(CdekError::Validation(_))
        ));
    }

    #[test]
    fn test_order_packages_synthesize_numbers() {
        let packages = vec![
            OrderPackage {
                number: None,
                weight: Some(json!(500)),
                length: Some(json!(20)),
                width: None,
                height: None,
                items: None,
            },
            OrderPackage {
                number: Some("BOX-7".to_string()),
                weight: Some(json!("750")),
                length: None,
                width: None,
                height: None,
                items: Some(vec![json!({ "name": "Книга", "amount": 1 })]),
            },
            OrderPackage {
                number: None,
                weight: Some(json!(250)),
                length: None,
                width: None,
                height: None,
                items: None,
            },
        ];

        let built = build_order_packages(&packages).unwrap();

        assert_eq!(built[0]["number"], json!("PACK-1"));
        assert_eq!(built[1]["number"], json!("BOX-7"));
        assert_eq!(built[2]["number"], json!("PACK-3"));
        assert_eq!(built[1]["weight"], json!(750.0));
        assert_eq!(built[1]["items"][0]["name"], json!("Книга"));
        assert!(built[0].get("width").is_none());
    }

    #[test]
    fn test_dedupe_quoted_tariffs() {
        let quote = json!({
            "tariff_codes": [
                { "tariff_code": 136, "tariff_name": "Посылка склад-склад", "delivery_mode": 4 },
                { "tariff_code": 137, "tariff_name": "Посылка склад-дверь", "delivery_mode": 3 },
                { "tariff_code": 136, "tariff_name": "Посылка склад-склад", "delivery_mode": 4 },
                { "tariff_name": "sin código" }
            ],
            "errors": []
        });

        let tariffs = dedupe_quoted_tariffs(&quote);

        assert_eq!(tariffs.len(), 2);
        assert_eq!(tariffs[0]["tariff_code"], json!(136));
        assert_eq!(tariffs[1]["tariff_code"], json!(137));
        assert!(tariffs
            .iter()
            .all(|t| t.get("tariff_code").is_some_and(|c| !c.is_null())));
    }

    #[test]
    fn test_warehouse_tariff_set() {
        assert!(WAREHOUSE_TO_WAREHOUSE_TARIFFS.contains(&136));
        assert!(WAREHOUSE_TO_WAREHOUSE_TARIFFS.contains(&234));
        assert!(!WAREHOUSE_TO_WAREHOUSE_TARIFFS.contains(&139));
    }
}
