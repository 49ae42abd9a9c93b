//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see domain
//! ports, so the pool and the object-store client are built once at start-up
//! and injected rather than created per request.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureLoginService, FixturePetCommand, FixturePetQuery, FixtureReservationCommand,
    FixtureReservationQuery, LoginService, PetCommand, PetQuery, ReservationCommand,
    ReservationQuery,
};

/// Largest avatar accepted when no limit is configured (5 MiB).
pub const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Session login.
    pub login: Arc<dyn LoginService>,
    /// Pet mutations, including avatar upload and repair.
    pub pets: Arc<dyn PetCommand>,
    pub pets_query: Arc<dyn PetQuery>,
    /// Reservation mutations.
    pub reservations: Arc<dyn ReservationCommand>,
    pub reservations_query: Arc<dyn ReservationQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            pets: Arc::new(FixturePetCommand),
            pets_query: Arc::new(FixturePetQuery),
            reservations: Arc::new(FixtureReservationCommand),
            reservations_query: Arc::new(FixtureReservationQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub pets: Arc<dyn PetCommand>,
    pub pets_query: Arc<dyn PetQuery>,
    pub reservations: Arc<dyn ReservationCommand>,
    pub reservations_query: Arc<dyn ReservationQuery>,
    /// Upper bound for a single avatar file part.
    pub max_avatar_bytes: usize,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_MAX_AVATAR_BYTES)
    }
}

impl HttpState {
    /// Construct state from a ports bundle and the avatar size limit.
    ///
    /// # Examples
    /// ```
    /// use pawsplay::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default(), 1024);
    /// assert_eq!(state.max_avatar_bytes, 1024);
    /// ```
    pub fn new(ports: HttpStatePorts, max_avatar_bytes: usize) -> Self {
        let HttpStatePorts {
            login,
            pets,
            pets_query,
            reservations,
            reservations_query,
        } = ports;
        Self {
            login,
            pets,
            pets_query,
            reservations,
            reservations_query,
            max_avatar_bytes,
        }
    }
}
