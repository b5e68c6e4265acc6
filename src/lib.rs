//! Delivery CDEK Gateway
//!
//! Backend HTTP que traduce un contrato JSON propio al formato del API v2
//! de CDEK: cotizaciones, puntos de retiro, localidades y creación de
//! órdenes, con cache de token en memoria.

pub mod api;
pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
