//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AvatarStore`]) are implemented by outbound
//! adapters. Driving ports (`*Command`, `*Query`, [`LoginService`]) are what
//! inbound handlers call.

mod macros;
pub(crate) use macros::define_port_error;

mod avatar_store;
mod login_service;
mod pet_command;
mod pet_query;
mod pet_repository;
mod reservation_command;
mod reservation_query;
mod reservation_repository;

#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError, FixtureAvatarStore};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    DisabledLoginService, FIXTURE_OWNER_ID, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use pet_command::MockPetCommand;
pub use pet_command::{AvatarRelinkRequest, FixturePetCommand, PetCommand, PetMutationRequest};
#[cfg(test)]
pub use pet_query::MockPetQuery;
pub use pet_query::{FixturePetQuery, PetQuery};
#[cfg(test)]
pub use pet_repository::MockPetRepository;
pub use pet_repository::{FixturePetRepository, PetRepository, PetRepositoryError};
#[cfg(test)]
pub use reservation_command::MockReservationCommand;
pub use reservation_command::{
    FixtureReservationCommand, ReservationCommand, ReservationMutationRequest,
};
#[cfg(test)]
pub use reservation_query::MockReservationQuery;
pub use reservation_query::{FixtureReservationQuery, ReservationQuery};
#[cfg(test)]
pub use reservation_repository::MockReservationRepository;
pub use reservation_repository::{
    FixtureReservationRepository, ReservationRepository, ReservationRepositoryError,
};
