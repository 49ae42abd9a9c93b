//! Port for reservation persistence.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DeleteStatus, PetReservations, Reservation, ReservationDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reservation repository adapters.
    pub enum ReservationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "reservation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reservation repository query failed: {message}",
        /// The write violated an integrity constraint, typically a `pet_id`
        /// that does not belong to the owner.
        Constraint { message: String } =>
            "reservation repository constraint violated: {message}",
    }
}

/// Record store contract for the `reservations` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation and return the stored row.
    async fn insert(
        &self,
        owner: &UserId,
        draft: &ReservationDraft,
    ) -> Result<Reservation, ReservationRepositoryError>;

    /// Replace the mutable fields of an owned reservation.
    ///
    /// Returns `None` when no row with `id` belongs to `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &ReservationDraft,
    ) -> Result<Option<Reservation>, ReservationRepositoryError>;

    /// Delete an owned reservation.
    async fn delete(
        &self,
        owner: &UserId,
        id: &Uuid,
    ) -> Result<DeleteStatus, ReservationRepositoryError>;

    /// List the owner's pets joined with their reservations.
    ///
    /// Pets without reservations are included with an empty list.
    async fn list_with_pets(
        &self,
        owner: &UserId,
    ) -> Result<Vec<PetReservations>, ReservationRepositoryError>;
}

/// Fixture implementation used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReservationRepository;

fn echo_reservation(owner: &UserId, id: Uuid, draft: &ReservationDraft) -> Reservation {
    Reservation {
        id,
        owner: owner.clone(),
        pet_id: draft.pet_id(),
        name: draft.name().to_owned(),
        date: draft.date(),
        time: draft.time(),
        service: draft.service(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ReservationRepository for FixtureReservationRepository {
    async fn insert(
        &self,
        owner: &UserId,
        draft: &ReservationDraft,
    ) -> Result<Reservation, ReservationRepositoryError> {
        Ok(echo_reservation(owner, Uuid::new_v4(), draft))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &ReservationDraft,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        Ok(Some(echo_reservation(owner, *id, draft)))
    }

    async fn delete(
        &self,
        _owner: &UserId,
        _id: &Uuid,
    ) -> Result<DeleteStatus, ReservationRepositoryError> {
        Ok(DeleteStatus::Deleted)
    }

    async fn list_with_pets(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<PetReservations>, ReservationRepositoryError> {
        Ok(Vec::new())
    }
}
