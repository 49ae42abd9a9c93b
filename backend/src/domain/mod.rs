//! Domain primitives, ports and services.
//!
//! Purpose: hold the pet and reservation types, the mutation pipeline that
//! writes them, and the port traits adapters implement. Nothing here knows
//! about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - MutationVerb, Mutation, MutationOutcome: the verb routing contract.
//! - PetMutationService, ReservationMutationService: pipeline orchestration.

pub mod attachment;
pub mod auth;
pub mod error;
pub mod mutation;
pub mod pet;
mod pet_service;
pub mod ports;
pub mod reservation;
mod reservation_service;
pub mod trace_id;
pub mod user;

pub use self::attachment::{AttachmentValidationError, AvatarPath, AvatarUpload};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::mutation::{
    AttachmentStage, DeleteStatus, Mutation, MutationAction, MutationOutcome, MutationVerb,
    UnsupportedVerb, attachment_failure,
};
pub use self::pet::{ParsePetKindError, Pet, PetChange, PetDraft, PetKind, PetValidationError};
pub use self::pet_service::PetMutationService;
pub use self::reservation::{
    CareService, ParseCareServiceError, PetReservations, Reservation, ReservationDraft,
    ReservationValidationError,
};
pub use self::reservation_service::ReservationMutationService;
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserValidationError};
