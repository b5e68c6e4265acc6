//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y las credenciales del
//! API de CDEK. Todas las variables son obligatorias: la ausencia de
//! cualquiera es una condición fatal de arranque, no un error de runtime.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Credenciales de CDEK
    pub cdek_base_url: String,
    pub cdek_account: String,
    pub cdek_secure_password: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            // Credenciales de CDEK
            cdek_base_url: env::var("CDEK_BASE_URL").expect("CDEK_BASE_URL must be set"),
            cdek_account: env::var("CDEK_ACCOUNT").expect("CDEK_ACCOUNT must be set"),
            cdek_secure_password: env::var("CDEK_SECURE_PASSWORD")
                .expect("CDEK_SECURE_PASSWORD must be set"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
