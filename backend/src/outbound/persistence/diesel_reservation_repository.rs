//! PostgreSQL-backed `ReservationRepository` implementation using Diesel ORM.
//!
//! The owner match between a reservation and its pet is enforced by the
//! composite foreign key; a mismatch surfaces as a constraint error.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReservationRepository, ReservationRepositoryError};
use crate::domain::{
    CareService, DeleteStatus, PetReservations, Reservation, ReservationDraft, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_pet_repository::row_to_pet;
use super::models::{NewReservationRow, PetRow, ReservationRow, ReservationUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{pets, reservations};

/// Diesel-backed implementation of the reservation repository port.
#[derive(Clone)]
pub struct DieselReservationRepository {
    pool: DbPool,
}

impl DieselReservationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReservationRepositoryError {
    map_basic_pool_error(error, ReservationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReservationRepositoryError {
    map_basic_diesel_error(
        error,
        ReservationRepositoryError::query,
        ReservationRepositoryError::connection,
        ReservationRepositoryError::constraint,
    )
}

fn row_to_reservation(row: ReservationRow) -> Result<Reservation, ReservationRepositoryError> {
    let service = row
        .service
        .parse::<CareService>()
        .map_err(|err| ReservationRepositoryError::query(err.to_string()))?;
    Ok(Reservation {
        id: row.id,
        owner: UserId::from_uuid(row.user_id),
        pet_id: row.pet_id,
        name: row.name,
        date: row.date,
        time: row.time,
        service,
        created_at: row.created_at,
    })
}

/// Group reservations under their pets, keeping pets without bookings.
fn group_by_pet(
    pet_rows: Vec<PetRow>,
    reservation_rows: Vec<ReservationRow>,
) -> Result<Vec<PetReservations>, ReservationRepositoryError> {
    let mut by_pet: HashMap<Uuid, Vec<Reservation>> = HashMap::new();
    for row in reservation_rows {
        let reservation = row_to_reservation(row)?;
        by_pet.entry(reservation.pet_id).or_default().push(reservation);
    }

    pet_rows
        .into_iter()
        .map(|row| {
            let pet =
                row_to_pet(row).map_err(|err| ReservationRepositoryError::query(err.to_string()))?;
            let reservations = by_pet.remove(&pet.id).unwrap_or_default();
            Ok(PetReservations { pet, reservations })
        })
        .collect()
}

#[async_trait]
impl ReservationRepository for DieselReservationRepository {
    async fn insert(
        &self,
        owner: &UserId,
        draft: &ReservationDraft,
    ) -> Result<Reservation, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewReservationRow {
            user_id: *owner.as_uuid(),
            pet_id: draft.pet_id(),
            name: draft.name(),
            date: draft.date(),
            time: draft.time(),
            service: draft.service().as_str(),
        };

        let row = diesel::insert_into(reservations::table)
            .values(&new_row)
            .returning(ReservationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_reservation(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &ReservationDraft,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ReservationUpdate {
            pet_id: draft.pet_id(),
            name: draft.name(),
            date: draft.date(),
            time: draft.time(),
            service: draft.service().as_str(),
        };

        let row = diesel::update(
            reservations::table.filter(
                reservations::id
                    .eq(id)
                    .and(reservations::user_id.eq(owner.as_uuid())),
            ),
        )
        .set(&changes)
        .returning(ReservationRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_reservation).transpose()
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &Uuid,
    ) -> Result<DeleteStatus, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            reservations::table.filter(
                reservations::id
                    .eq(id)
                    .and(reservations::user_id.eq(owner.as_uuid())),
            ),
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

    async fn list_with_pets(
        &self,
        owner: &UserId,
    ) -> Result<Vec<PetReservations>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let pet_rows: Vec<PetRow> = pets::table
            .filter(pets::user_id.eq(owner.as_uuid()))
            .order((pets::created_at.asc(), pets::id.asc()))
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let reservation_rows: Vec<ReservationRow> = reservations::table
            .inner_join(pets::table)
            .filter(reservations::user_id.eq(owner.as_uuid()))
            .order((reservations::date.asc(), reservations::time.asc()))
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        group_by_pet(pet_rows, reservation_rows)
    }
}
