//! Servicio de tokens CDEK
//!
//! Este módulo mantiene en memoria el token bearer del API de CDEK y lo
//! renueva de forma transparente cerca de su expiración. El token nunca se
//! persiste fuera del proceso.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::cdek::CdekCredentials;
use crate::utils::errors::CdekError;

/// Margen de seguridad antes de la expiración real del token
const TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

/// Vida por defecto del token cuando CDEK no informa `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Token cacheado con su instante de expiración
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Un token es válido solo si queda margen antes de su expiración
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - Duration::seconds(TOKEN_SAFETY_MARGIN_SECS)
    }
}

/// Cache de credenciales CDEK
///
/// Instancia propia del cliente, no un singleton de módulo. El camino de
/// refresco no lleva guard de exclusión: dos callers concurrentes que vean
/// el token expirado pueden hacer cada uno su intercambio de credenciales y
/// la última respuesta gana el slot. El intercambio es idempotente para el
/// caller, así que es una ineficiencia tolerada, no un bug de corrección.
#[derive(Clone)]
pub struct CdekTokenService {
    http: Client,
    credentials: CdekCredentials,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl CdekTokenService {
    pub fn new(http: Client, credentials: CdekCredentials) -> Self {
        Self {
            http,
            credentials,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Obtener un token válido, renovando si hace falta
    pub async fn get_token(&self) -> Result<String, CdekError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_valid(Utc::now()) {
                    log::debug!("🔑 Token CDEK en caché todavía válido");
                    return Ok(token.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }

    /// Invalidar el token cacheado incondicionalmente
    ///
    /// El siguiente `get_token()` siempre hará un round trip de red.
    pub async fn reset_token(&self) {
        log::info!("🗑️ Invalidando token CDEK cacheado");
        *self.cached.write().await = None;
    }

    /// Intercambio client-credentials contra el endpoint de tokens de CDEK
    async fn fetch_token(&self) -> Result<String, CdekError> {
        let url = format!("{}/v2/oauth/token", self.credentials.base_url);
        log::info!("🔐 Solicitando token CDEK en {}", url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.account.as_str()),
                ("client_secret", self.credentials.secure_password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Autenticación CDEK rechazada: HTTP {}", status);
            return Err(CdekError::Authentication { status, body });
        }

        let payload: Value = response.json().await?;
        let access_token = payload
            .get("access_token")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| CdekError::Authentication {
                status,
                body: "token response without access_token".to_string(),
            })?;
        let expires_in = payload
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let expires_at =
            Utc::now() + Duration::seconds(expires_in - TOKEN_SAFETY_MARGIN_SECS);
        log::info!(
            "✅ Token CDEK renovado, expira en {}s (margen incluido)",
            expires_in - TOKEN_SAFETY_MARGIN_SECS
        );

        *self.cached.write().await = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_validity_margin() {
        let now = Utc::now();
        let fresh = CachedToken {
            access_token: "tok".to_string(),
            expires_at: now + Duration::seconds(600),
        };
        assert!(fresh.is_valid(now));

        // Dentro del margen de seguridad ya no se considera válido
        let near_expiry = CachedToken {
            access_token: "tok".to_string(),
            expires_at: now + Duration::seconds(TOKEN_SAFETY_MARGIN_SECS - 1),
        };
        assert!(!near_expiry.is_valid(now));

        let expired = CachedToken {
            access_token: "tok".to_string(),
            expires_at: now - Duration::seconds(1),
        };
        assert!(!expired.is_valid(now));
    }
}
