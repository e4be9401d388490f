//! # cpoll Common Library
//!
//! Shared code for the campaign polling service including:
//! - Response record model and submission types
//! - Response storage (development file backend, SQL backend)
//! - Field validation and the intake wizard state machine
//! - State/LGA reference data
//! - Persona completion and credential checking seams
//! - Configuration loading

pub mod auth;
pub mod config;
pub mod error;
pub mod intake;
pub mod models;
pub mod persona;
pub mod reference;
pub mod store;
pub mod validation;

pub use error::{Error, FieldError, Result, ValidationErrors};
pub use models::{NewResponse, ResponseRecord, ResponseSubmission};
pub use store::ResponseStore;
