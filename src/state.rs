//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El cache de tokens de CDEK vive dentro del
//! cliente, no aquí: clonar el estado comparte el mismo slot de token.

use crate::clients::cdek_client::CdekClient;
use crate::config::environment::EnvironmentConfig;
use crate::models::cdek::CdekCredentials;
use crate::utils::errors::CdekError;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cdek: CdekClient,
}

impl AppState {
    /// Construir el estado con las credenciales de la configuración
    ///
    /// Falla en construcción si falta cualquier pieza de las credenciales.
    pub fn new(config: EnvironmentConfig) -> Result<Self, CdekError> {
        let credentials = CdekCredentials::new(
            config.cdek_base_url.clone(),
            config.cdek_account.clone(),
            config.cdek_secure_password.clone(),
        )?;
        let cdek = CdekClient::new(credentials)?;

        Ok(Self { config, cdek })
    }
}
