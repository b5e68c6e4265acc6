//! Servicios de la aplicación

pub mod token_service;
