//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin: they translate between the internal row structs
//! (`models.rs`) and domain types, scope every statement to the owner, and
//! map database failures onto the port error enums. Connections come from a
//! `bb8` pool through `diesel-async`.

mod diesel_basic_error_mapping;
mod diesel_pet_repository;
mod diesel_reservation_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_pet_repository::DieselPetRepository;
pub use diesel_reservation_repository::DieselReservationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
