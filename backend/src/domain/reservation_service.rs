//! Reservation mutation pipeline.
//!
//! Reservations carry no attachment, so the pipeline is just the primary
//! write. Ownership of the referenced pet is enforced by the store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    ReservationCommand, ReservationMutationRequest, ReservationQuery, ReservationRepository,
    ReservationRepositoryError,
};
use crate::domain::{
    DeleteStatus, Error, Mutation, MutationAction, MutationOutcome, PetReservations, UserId,
};

/// Reservation service implementing the reservation driving ports.
#[derive(Clone)]
pub struct ReservationMutationService<R> {
    reservations: Arc<R>,
}

impl<R> ReservationMutationService<R> {
    /// Create a new service over the reservation store.
    pub fn new(reservations: Arc<R>) -> Self {
        Self { reservations }
    }
}

fn map_reservation_repository_error(error: ReservationRepositoryError) -> Error {
    match error {
        ReservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reservation repository unavailable: {message}"))
        }
        ReservationRepositoryError::Query { message } => {
            Error::internal(format!("reservation repository error: {message}"))
        }
        // Most often the referenced pet is missing or owned by someone else.
        ReservationRepositoryError::Constraint { message } => {
            Error::invalid_request("reservation violates a data constraint").with_details(json!({
                "code": "constraint_violation",
                "reason": message,
            }))
        }
    }
}

fn reservation_not_found(id: &Uuid) -> Error {
    Error::not_found(format!("reservation {id} not found")).with_details(json!({ "id": id }))
}

#[async_trait]
impl<R> ReservationCommand for ReservationMutationService<R>
where
    R: ReservationRepository,
{
    async fn apply(
        &self,
        request: ReservationMutationRequest,
    ) -> Result<MutationOutcome, Error> {
        let ReservationMutationRequest { owner, mutation } = request;
        let outcome = match mutation {
            Mutation::Create(draft) => {
                let reservation = self
                    .reservations
                    .insert(&owner, &draft)
                    .await
                    .map_err(map_reservation_repository_error)?;
                MutationOutcome::new(MutationAction::Created, reservation.id)
            }
            Mutation::Update { id, draft } => {
                let reservation = self
                    .reservations
                    .update(&owner, &id, &draft)
                    .await
                    .map_err(map_reservation_repository_error)?
                    .ok_or_else(|| reservation_not_found(&id))?;
                MutationOutcome::new(MutationAction::Updated, reservation.id)
            }
            Mutation::Delete { id } => match self
                .reservations
                .delete(&owner, &id)
                .await
                .map_err(map_reservation_repository_error)?
            {
                DeleteStatus::Deleted => MutationOutcome::new(MutationAction::Deleted, id),
                DeleteStatus::Missing => return Err(reservation_not_found(&id)),
            },
        };
        info!(
            owner = %owner,
            record_id = %outcome.id,
            action = %outcome.action,
            "reservation mutation applied"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl<R> ReservationQuery for ReservationMutationService<R>
where
    R: ReservationRepository,
{
    async fn list_pet_reservations(
        &self,
        owner: &UserId,
    ) -> Result<Vec<PetReservations>, Error> {
        self.reservations
            .list_with_pets(owner)
            .await
            .map_err(map_reservation_repository_error)
    }
}
