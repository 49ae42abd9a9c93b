//! Builders wiring the driving ports onto their adapters.
//!
//! A database pool selects the Diesel repositories; without one the fixture
//! repositories echo writes back so the HTTP surface stays usable in
//! development. The avatar store is chosen independently.

use std::sync::Arc;

use actix_web::web;

use pawsplay::domain::ports::{
    AvatarStore, DisabledLoginService, FixtureLoginService, FixturePetRepository,
    FixtureReservationRepository, LoginService, PetCommand, PetQuery, PetRepository,
    ReservationCommand, ReservationQuery,
};
use pawsplay::domain::{PetMutationService, ReservationMutationService};
use pawsplay::inbound::http::state::{HttpState, HttpStatePorts};
use pawsplay::outbound::persistence::{DbPool, DieselPetRepository, DieselReservationRepository};
use pawsplay::outbound::storage::{FilesystemAvatarStore, HttpAvatarStore};
use tracing::{info, warn};

use super::ServerConfig;
use super::config::AvatarBackend;

type PetPorts = (Arc<dyn PetCommand>, Arc<dyn PetQuery>);
type ReservationPorts = (Arc<dyn ReservationCommand>, Arc<dyn ReservationQuery>);

fn pet_service<R, S>(pets: R, avatars: S) -> PetPorts
where
    R: PetRepository + 'static,
    S: AvatarStore + 'static,
{
    let service = Arc::new(PetMutationService::new(Arc::new(pets), Arc::new(avatars)));
    (service.clone(), service)
}

fn pet_ports_with_store<S>(pool: Option<&DbPool>, avatars: S) -> PetPorts
where
    S: AvatarStore + 'static,
{
    match pool {
        Some(pool) => pet_service(DieselPetRepository::new(pool.clone()), avatars),
        None => pet_service(FixturePetRepository, avatars),
    }
}

/// Build the pet command/query pair for the configured backends.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the object-storage client cannot be
/// constructed.
fn build_pet_ports(config: &ServerConfig) -> std::io::Result<PetPorts> {
    let pool = config.db_pool.as_ref();
    match &config.avatars {
        AvatarBackend::Http {
            base,
            bucket,
            api_key,
            timeout,
        } => {
            info!(base = %base, bucket = %bucket, "avatars go to object storage");
            let store = HttpAvatarStore::new(base.clone(), bucket.clone(), api_key.clone(), *timeout)
                .map_err(|err| std::io::Error::other(format!("storage client: {err}")))?;
            Ok(pet_ports_with_store(pool, store))
        }
        AvatarBackend::Filesystem { root } => {
            info!(root = %root.display(), "avatars go to the local filesystem");
            Ok(pet_ports_with_store(
                pool,
                FilesystemAvatarStore::new(root.clone()),
            ))
        }
    }
}

fn build_reservation_ports(config: &ServerConfig) -> ReservationPorts {
    match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(ReservationMutationService::new(Arc::new(
                DieselReservationRepository::new(pool.clone()),
            )));
            (service.clone(), service)
        }
        None => {
            let service = Arc::new(ReservationMutationService::new(Arc::new(
                FixtureReservationRepository,
            )));
            (service.clone(), service)
        }
    }
}

fn build_login_port(config: &ServerConfig) -> Arc<dyn LoginService> {
    if config.fixture_login {
        warn!("development login enabled: admin/password maps to a fixed owner");
        Arc::new(FixtureLoginService)
    } else {
        Arc::new(DisabledLoginService)
    }
}

/// Assemble the shared handler state.
///
/// # Errors
///
/// Propagates failures from building the avatar store client.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let (pets, pets_query) = build_pet_ports(config)?;
    let (reservations, reservations_query) = build_reservation_ports(config);
    let ports = HttpStatePorts {
        login: build_login_port(config),
        pets,
        pets_query,
        reservations,
        reservations_query,
    };
    Ok(web::Data::new(HttpState::new(ports, config.max_avatar_bytes)))
}
