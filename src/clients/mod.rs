//! Clientes HTTP hacia servicios externos

pub mod cdek_client;
