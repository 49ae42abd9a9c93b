//! Driving port for session login.
//!
//! Handlers authenticate through this port so tests can swap in a double
//! instead of an identity provider.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Owner id issued by [`FixtureLoginService`].
pub const FIXTURE_OWNER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Authentication use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated owner.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator: `admin` / `password` maps to a fixed owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            UserId::new(FIXTURE_OWNER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture owner id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

/// Authenticator for deployments without a development login: every attempt
/// is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoginService;

#[async_trait]
impl LoginService for DisabledLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<UserId, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }
}
