//! HTTP API handlers for cpoll-server

pub mod admin;
pub mod auth;
pub mod buildinfo;
pub mod health;
pub mod persona;
pub mod reference;
pub mod responses;

pub use admin::{admin_login, export_csv, export_pdf, get_dashboard};
pub use auth::admin_auth_middleware;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use persona::{ask_persona, get_suggestions};
pub use reference::get_states;
pub use responses::{list_responses, submit_response};
