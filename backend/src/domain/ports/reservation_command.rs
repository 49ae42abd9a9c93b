//! Driving port for reservation mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Mutation, MutationAction, MutationOutcome, ReservationDraft, UserId};

/// One decoded reservation mutation for an authenticated owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationMutationRequest {
    /// Owner resolved from the session.
    pub owner: UserId,
    /// The create, update or delete to apply.
    pub mutation: Mutation<ReservationDraft>,
}

/// Reservation mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationCommand: Send + Sync {
    /// Run the mutation pipeline for one request.
    async fn apply(&self, request: ReservationMutationRequest)
    -> Result<MutationOutcome, Error>;
}

/// Fixture implementation reporting success without touching any backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReservationCommand;

#[async_trait]
impl ReservationCommand for FixtureReservationCommand {
    async fn apply(
        &self,
        request: ReservationMutationRequest,
    ) -> Result<MutationOutcome, Error> {
        Ok(match request.mutation {
            Mutation::Create(_) => MutationOutcome::new(MutationAction::Created, Uuid::new_v4()),
            Mutation::Update { id, .. } => MutationOutcome::new(MutationAction::Updated, id),
            Mutation::Delete { id } => MutationOutcome::new(MutationAction::Deleted, id),
        })
    }
}
