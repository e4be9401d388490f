//! Clients for external services

pub mod persona_client;

pub use persona_client::ChatPersonaClient;
