//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert through the validated
//! domain constructors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pets, reservations};

/// Row read from `pets`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub age: i32,
    pub breed: String,
    pub kind: Option<String>,
    pub avatar_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable pet; `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pets)]
pub(crate) struct NewPetRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub age: i32,
    pub breed: &'a str,
    pub kind: Option<&'a str>,
}

/// Full replacement of a pet's mutable fields.
///
/// `treat_none_as_null` so clearing the type on update clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pets)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PetUpdate<'a> {
    pub name: &'a str,
    pub age: i32,
    pub breed: &'a str,
    pub kind: Option<&'a str>,
}

/// Row read from `reservations`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable reservation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub(crate) struct NewReservationRow<'a> {
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub name: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: &'a str,
}

/// Full replacement of a reservation's mutable fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reservations)]
pub(crate) struct ReservationUpdate<'a> {
    pub pet_id: Uuid,
    pub name: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: &'a str,
}
