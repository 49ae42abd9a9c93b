//! Pet mutation pipeline.
//!
//! Runs the primary write, then the optional avatar upload, then the link
//! patch, strictly in that order. Nothing is rolled back: when the record is
//! stored but the avatar step fails the caller receives `attachment_failed`
//! carrying the record id, and can retry through
//! [`PetCommand::relink_avatar`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AvatarRelinkRequest, AvatarStore, PetCommand, PetMutationRequest, PetQuery, PetRepository,
    PetRepositoryError,
};
use crate::domain::{
    AttachmentStage, AvatarPath, AvatarUpload, DeleteStatus, Error, Mutation, MutationAction,
    MutationOutcome, Pet, UserId, attachment_failure,
};

/// Pet service implementing the pet driving ports.
#[derive(Clone)]
pub struct PetMutationService<R, S> {
    pets: Arc<R>,
    avatars: Arc<S>,
}

impl<R, S> PetMutationService<R, S> {
    /// Create a new service over a record store and an avatar store.
    pub fn new(pets: Arc<R>, avatars: Arc<S>) -> Self {
        Self { pets, avatars }
    }
}

fn map_pet_repository_error(error: PetRepositoryError) -> Error {
    match error {
        PetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pet repository unavailable: {message}"))
        }
        PetRepositoryError::Query { message } => {
            Error::internal(format!("pet repository error: {message}"))
        }
        PetRepositoryError::Constraint { message } => {
            Error::invalid_request("pet violates a data constraint").with_details(json!({
                "code": "constraint_violation",
                "reason": message,
            }))
        }
    }
}

fn pet_not_found(id: &Uuid) -> Error {
    Error::not_found(format!("pet {id} not found")).with_details(json!({ "id": id }))
}

impl<R, S> PetMutationService<R, S>
where
    R: PetRepository,
    S: AvatarStore,
{
    /// Upload `avatar` (if any) to the deterministic path for `id` and link
    /// it to the record.
    async fn attach(
        &self,
        owner: &UserId,
        action: MutationAction,
        id: Uuid,
        avatar: Option<AvatarUpload>,
    ) -> Result<MutationOutcome, Error> {
        let outcome = MutationOutcome::new(action, id);
        let Some(upload) = avatar else {
            return Ok(outcome);
        };

        let path = AvatarPath::for_entity(owner, &id);
        debug!(record_id = %id, path = %path, bytes = upload.len(), "uploading avatar");
        if let Err(err) = self.avatars.upload(&path, &upload).await {
            warn!(record_id = %id, stage = "upload", error = %err, "avatar upload failed");
            return Err(attachment_failure(action, id, AttachmentStage::Upload, err));
        }

        match self.pets.set_avatar_path(owner, &id, &path).await {
            Ok(true) => Ok(outcome.with_avatar(path)),
            Ok(false) => {
                warn!(record_id = %id, stage = "link", "pet vanished before avatar link");
                Err(attachment_failure(
                    action,
                    id,
                    AttachmentStage::Link,
                    "record no longer exists",
                ))
            }
            Err(err) => {
                warn!(record_id = %id, stage = "link", error = %err, "avatar link failed");
                Err(attachment_failure(action, id, AttachmentStage::Link, err))
            }
        }
    }
}

#[async_trait]
impl<R, S> PetCommand for PetMutationService<R, S>
where
    R: PetRepository,
    S: AvatarStore,
{
    async fn apply(&self, request: PetMutationRequest) -> Result<MutationOutcome, Error> {
        let PetMutationRequest { owner, mutation } = request;
        let outcome = match mutation {
            Mutation::Create(change) => {
                let pet = self
                    .pets
                    .insert(&owner, &change.draft)
                    .await
                    .map_err(map_pet_repository_error)?;
                self.attach(&owner, MutationAction::Created, pet.id, change.avatar)
                    .await?
            }
            Mutation::Update { id, draft: change } => {
                let pet = self
                    .pets
                    .update(&owner, &id, &change.draft)
                    .await
                    .map_err(map_pet_repository_error)?
                    .ok_or_else(|| pet_not_found(&id))?;
                self.attach(&owner, MutationAction::Updated, pet.id, change.avatar)
                    .await?
            }
            Mutation::Delete { id } => {
                match self
                    .pets
                    .delete(&owner, &id)
                    .await
                    .map_err(map_pet_repository_error)?
                {
                    DeleteStatus::Deleted => MutationOutcome::new(MutationAction::Deleted, id),
                    DeleteStatus::Missing => return Err(pet_not_found(&id)),
                }
            }
        };
        info!(
            owner = %owner,
            record_id = %outcome.id,
            action = %outcome.action,
            "pet mutation applied"
        );
        Ok(outcome)
    }

    async fn relink_avatar(
        &self,
        request: AvatarRelinkRequest,
    ) -> Result<MutationOutcome, Error> {
        let AvatarRelinkRequest {
            owner,
            pet_id,
            avatar,
        } = request;
        self.pets
            .find_by_id(&owner, &pet_id)
            .await
            .map_err(map_pet_repository_error)?
            .ok_or_else(|| pet_not_found(&pet_id))?;
        self.attach(&owner, MutationAction::Updated, pet_id, Some(avatar))
            .await
    }
}

#[async_trait]
impl<R, S> PetQuery for PetMutationService<R, S>
where
    R: PetRepository,
    S: AvatarStore,
{
    async fn list_pets(&self, owner: &UserId) -> Result<Vec<Pet>, Error> {
        self.pets
            .list_for_owner(owner)
            .await
            .map_err(map_pet_repository_error)
    }
}

#[cfg(test)]
#[path = "pet_service_tests.rs"]
mod tests;
