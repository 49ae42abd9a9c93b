//! Driving port for pet mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AvatarPath, AvatarUpload, Error, Mutation, MutationAction, MutationOutcome, PetChange, UserId,
};

/// One decoded pet mutation for an authenticated owner.
#[derive(Debug, Clone, PartialEq)]
pub struct PetMutationRequest {
    /// Owner resolved from the session.
    pub owner: UserId,
    /// The create, update or delete to apply.
    pub mutation: Mutation<PetChange>,
}

/// Re-run the avatar upload and link for an existing pet.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarRelinkRequest {
    /// Owner resolved from the session.
    pub owner: UserId,
    /// Pet to repair.
    pub pet_id: Uuid,
    /// Image to store.
    pub avatar: AvatarUpload,
}

/// Pet mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetCommand: Send + Sync {
    /// Run the full mutation pipeline for one request.
    async fn apply(&self, request: PetMutationRequest) -> Result<MutationOutcome, Error>;

    /// Upload and link an avatar for a pet that already exists.
    ///
    /// Repeating the call converges on the same stored state.
    async fn relink_avatar(&self, request: AvatarRelinkRequest)
    -> Result<MutationOutcome, Error>;
}

/// Fixture implementation reporting success without touching any backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePetCommand;

#[async_trait]
impl PetCommand for FixturePetCommand {
    async fn apply(&self, request: PetMutationRequest) -> Result<MutationOutcome, Error> {
        let PetMutationRequest { owner, mutation } = request;
        let (action, id, change) = match mutation {
            Mutation::Create(change) => (MutationAction::Created, Uuid::new_v4(), Some(change)),
            Mutation::Update { id, draft } => (MutationAction::Updated, id, Some(draft)),
            Mutation::Delete { id } => (MutationAction::Deleted, id, None),
        };
        let outcome = MutationOutcome::new(action, id);
        Ok(match change.and_then(|change| change.avatar) {
            Some(_) => outcome.with_avatar(AvatarPath::for_entity(&owner, &id)),
            None => outcome,
        })
    }

    async fn relink_avatar(
        &self,
        request: AvatarRelinkRequest,
    ) -> Result<MutationOutcome, Error> {
        Ok(
            MutationOutcome::new(MutationAction::Updated, request.pet_id)
                .with_avatar(AvatarPath::for_entity(&request.owner, &request.pet_id)),
        )
    }
}
