//! HTTP inbound adapter exposing the REST endpoints.

pub(crate) mod form;
pub mod error;
pub mod health;
pub mod pets;
pub mod reservations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
