//! Driving port for reading reservations.

use async_trait::async_trait;

use crate::domain::{Error, PetReservations, UserId};

/// Reservation read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationQuery: Send + Sync {
    /// List the owner's pets joined with their reservations.
    async fn list_pet_reservations(&self, owner: &UserId) -> Result<Vec<PetReservations>, Error>;
}

/// Fixture implementation returning nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReservationQuery;

#[async_trait]
impl ReservationQuery for FixtureReservationQuery {
    async fn list_pet_reservations(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<PetReservations>, Error> {
        Ok(Vec::new())
    }
}
