//! Port for pet persistence.
//!
//! Every operation is scoped to an owner: adapters must never read or write
//! a row belonging to a different user.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AvatarPath, DeleteStatus, Pet, PetDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pet repository adapters.
    pub enum PetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pet repository query failed: {message}",
        /// The write violated an integrity constraint.
        Constraint { message: String } => "pet repository constraint violated: {message}",
    }
}

/// Record store contract for the `pets` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a pet and return the stored row.
    async fn insert(&self, owner: &UserId, draft: &PetDraft) -> Result<Pet, PetRepositoryError>;

    /// Replace the mutable fields of an owned pet.
    ///
    /// Returns `None` when no row with `id` belongs to `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &PetDraft,
    ) -> Result<Option<Pet>, PetRepositoryError>;

    /// Delete an owned pet.
    async fn delete(&self, owner: &UserId, id: &Uuid) -> Result<DeleteStatus, PetRepositoryError>;

    /// Point the pet's avatar reference at `path`.
    ///
    /// Returns `false` when the row no longer exists.
    async fn set_avatar_path(
        &self,
        owner: &UserId,
        id: &Uuid,
        path: &AvatarPath,
    ) -> Result<bool, PetRepositoryError>;

    /// Fetch one owned pet.
    async fn find_by_id(&self, owner: &UserId, id: &Uuid)
    -> Result<Option<Pet>, PetRepositoryError>;

    /// List the owner's pets, oldest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Pet>, PetRepositoryError>;
}

/// Fixture implementation used when no database is configured.
///
/// Writes echo their input back without storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePetRepository;

fn echo_pet(owner: &UserId, id: Uuid, draft: &PetDraft) -> Pet {
    Pet {
        id,
        owner: owner.clone(),
        name: draft.name().to_owned(),
        age: draft.age(),
        breed: draft.breed().to_owned(),
        kind: draft.kind(),
        avatar_path: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl PetRepository for FixturePetRepository {
    async fn insert(&self, owner: &UserId, draft: &PetDraft) -> Result<Pet, PetRepositoryError> {
        Ok(echo_pet(owner, Uuid::new_v4(), draft))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &PetDraft,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        Ok(Some(echo_pet(owner, *id, draft)))
    }

    async fn delete(
        &self,
        _owner: &UserId,
        _id: &Uuid,
    ) -> Result<DeleteStatus, PetRepositoryError> {
        Ok(DeleteStatus::Deleted)
    }

    async fn set_avatar_path(
        &self,
        _owner: &UserId,
        _id: &Uuid,
        _path: &AvatarPath,
    ) -> Result<bool, PetRepositoryError> {
        Ok(true)
    }

    async fn find_by_id(
        &self,
        _owner: &UserId,
        _id: &Uuid,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PetKind;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_insert_echoes_draft() {
        let owner = UserId::random();
        let draft = PetDraft::new("Rex", 3, "Lab", Some(PetKind::Dog)).expect("valid draft");
        let pet = FixturePetRepository
            .insert(&owner, &draft)
            .await
            .expect("fixture insert succeeds");
        assert_eq!(pet.owner, owner);
        assert_eq!(pet.name, "Rex");
        assert!(pet.avatar_path.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_list_is_empty() {
        let pets = FixturePetRepository
            .list_for_owner(&UserId::random())
            .await
            .expect("fixture list succeeds");
        assert!(pets.is_empty());
    }

    #[rstest]
    fn errors_render_messages() {
        assert_eq!(
            PetRepositoryError::constraint("pets_pkey").to_string(),
            "pet repository constraint violated: pets_pkey"
        );
    }
}
