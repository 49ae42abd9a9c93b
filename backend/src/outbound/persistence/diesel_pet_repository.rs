//! PostgreSQL-backed `PetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PetRepository, PetRepositoryError};
use crate::domain::{AvatarPath, DeleteStatus, Pet, PetDraft, PetKind, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPetRow, PetRow, PetUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::pets;

/// Diesel-backed implementation of the pet repository port.
#[derive(Clone)]
pub struct DieselPetRepository {
    pool: DbPool,
}

impl DieselPetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PetRepositoryError {
    map_basic_pool_error(error, PetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PetRepositoryError {
    map_basic_diesel_error(
        error,
        PetRepositoryError::query,
        PetRepositoryError::connection,
        PetRepositoryError::constraint,
    )
}

/// Convert a stored row back into a domain pet, rejecting corrupt values.
pub(super) fn row_to_pet(row: PetRow) -> Result<Pet, PetRepositoryError> {
    let PetRow {
        id,
        user_id,
        name,
        age,
        breed,
        kind,
        avatar_path,
        created_at,
    } = row;

    let age = u16::try_from(age)
        .map_err(|_| PetRepositoryError::query(format!("pet {id} has invalid age {age}")))?;
    let kind = kind
        .map(|raw| raw.parse::<PetKind>())
        .transpose()
        .map_err(|err| PetRepositoryError::query(err.to_string()))?;
    let avatar_path = avatar_path
        .map(AvatarPath::parse)
        .transpose()
        .map_err(|err| PetRepositoryError::query(err.to_string()))?;

    Ok(Pet {
        id,
        owner: UserId::from_uuid(user_id),
        name,
        age,
        breed,
        kind,
        avatar_path,
        created_at,
    })
}

#[async_trait]
impl PetRepository for DieselPetRepository {
    async fn insert(&self, owner: &UserId, draft: &PetDraft) -> Result<Pet, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPetRow {
            user_id: *owner.as_uuid(),
            name: draft.name(),
            age: i32::from(draft.age()),
            breed: draft.breed(),
            kind: draft.kind().map(PetKind::as_str),
        };

        let row = diesel::insert_into(pets::table)
            .values(&new_row)
            .returning(PetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_pet(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &PetDraft,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PetUpdate {
            name: draft.name(),
            age: i32::from(draft.age()),
            breed: draft.breed(),
            kind: draft.kind().map(PetKind::as_str),
        };

        let row = diesel::update(
            pets::table.filter(pets::id.eq(id).and(pets::user_id.eq(owner.as_uuid()))),
        )
        .set(&changes)
        .returning(PetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_pet).transpose()
    }

    async fn delete(&self, owner: &UserId, id: &Uuid) -> Result<DeleteStatus, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            pets::table.filter(pets::id.eq(id).and(pets::user_id.eq(owner.as_uuid()))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(if removed == 0 {
            DeleteStatus::Missing
        } else {
            DeleteStatus::Deleted
        })
    }

    async fn set_avatar_path(
        &self,
        owner: &UserId,
        id: &Uuid,
        path: &AvatarPath,
    ) -> Result<bool, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(
            pets::table.filter(pets::id.eq(id).and(pets::user_id.eq(owner.as_uuid()))),
        )
        .set(pets::avatar_path.eq(path.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(touched > 0)
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &Uuid,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = pets::table
            .filter(pets::id.eq(id).and(pets::user_id.eq(owner.as_uuid())))
            .select(PetRow::as_select())
            .first::<PetRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_pet).transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetRow> = pets::table
            .filter(pets::user_id.eq(owner.as_uuid()))
            .order((pets::created_at.asc(), pets::id.asc()))
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_pet).collect()
    }
}
