//! Shared harness for backend integration tests.
//!
//! Integration tests compile as separate crates, so the mockall doubles
//! generated inside the library are not visible here. These recording
//! adapters implement the driven ports directly and append every backend call
//! to one shared log, letting tests assert on ordering across the record
//! store and the avatar store.

#![allow(dead_code, reason = "each test crate uses a different subset of the harness")]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use pawsplay::Trace;
use pawsplay::domain::ports::{
    AvatarStore, AvatarStoreError, FixtureLoginService, PetRepository, PetRepositoryError,
    ReservationRepository, ReservationRepositoryError,
};
use pawsplay::domain::{
    AvatarPath, AvatarUpload, DeleteStatus, Pet, PetDraft, PetMutationService, PetReservations,
    Reservation, ReservationDraft, ReservationMutationService, UserId,
};
use pawsplay::inbound::http::pets::{pets_resource, relink_pet_avatar};
use pawsplay::inbound::http::reservations::reservations_resource;
use pawsplay::inbound::http::state::{HttpState, HttpStatePorts};
use pawsplay::inbound::http::users::login;

/// Identity returned by [`FixtureLoginService`] for `admin`/`password`.
pub const OWNER: &str = "123e4567-e89b-12d3-a456-426614174000";

/// One call observed by a recording adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InsertPet { name: String },
    UpdatePet { id: Uuid },
    DeletePet { id: Uuid },
    FindPet { id: Uuid },
    LinkAvatar { id: Uuid, path: String },
    Upload { path: String, bytes: Vec<u8> },
    InsertReservation { pet_id: Uuid },
    UpdateReservation { id: Uuid },
    DeleteReservation { id: Uuid },
}

/// Ordered log shared by every recording adapter of one test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().expect("call log poisoned").push(call);
    }

    /// Snapshot of the calls made so far.
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().expect("call log poisoned").clone()
    }
}

fn stored_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Pet store assigning a fixed id on insert and tracking which ids exist.
pub struct RecordingPets {
    log: CallLog,
    next_id: Uuid,
    existing: Mutex<HashSet<Uuid>>,
}

impl RecordingPets {
    pub fn new(log: CallLog, next_id: Uuid, existing: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            log,
            next_id,
            existing: Mutex::new(existing.into_iter().collect()),
        }
    }

    fn exists(&self, id: &Uuid) -> bool {
        self.existing.lock().expect("pet set poisoned").contains(id)
    }

    fn row(owner: &UserId, id: Uuid, draft: &PetDraft) -> Pet {
        Pet {
            id,
            owner: owner.clone(),
            name: draft.name().to_owned(),
            age: draft.age(),
            breed: draft.breed().to_owned(),
            kind: draft.kind(),
            avatar_path: None,
            created_at: stored_at(),
        }
    }
}

#[async_trait]
impl PetRepository for RecordingPets {
    async fn insert(&self, owner: &UserId, draft: &PetDraft) -> Result<Pet, PetRepositoryError> {
        self.log.push(Call::InsertPet {
            name: draft.name().to_owned(),
        });
        self.existing
            .lock()
            .expect("pet set poisoned")
            .insert(self.next_id);
        Ok(Self::row(owner, self.next_id, draft))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &PetDraft,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        self.log.push(Call::UpdatePet { id: *id });
        Ok(self.exists(id).then(|| Self::row(owner, *id, draft)))
    }

    async fn delete(&self, _owner: &UserId, id: &Uuid) -> Result<DeleteStatus, PetRepositoryError> {
        self.log.push(Call::DeletePet { id: *id });
        let removed = self.existing.lock().expect("pet set poisoned").remove(id);
        Ok(if removed {
            DeleteStatus::Deleted
        } else {
            DeleteStatus::Missing
        })
    }

    async fn set_avatar_path(
        &self,
        _owner: &UserId,
        id: &Uuid,
        path: &AvatarPath,
    ) -> Result<bool, PetRepositoryError> {
        self.log.push(Call::LinkAvatar {
            id: *id,
            path: path.as_str().to_owned(),
        });
        Ok(self.exists(id))
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &Uuid,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        self.log.push(Call::FindPet { id: *id });
        if !self.exists(id) {
            return Ok(None);
        }
        let draft = PetDraft::new("Rex", 3, "Lab", None).expect("valid draft");
        Ok(Some(Self::row(owner, *id, &draft)))
    }

    async fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        Ok(Vec::new())
    }
}

/// Avatar store that records uploads and optionally refuses them.
pub struct RecordingAvatars {
    log: CallLog,
    fail_with: Option<AvatarStoreError>,
}

impl RecordingAvatars {
    pub fn accepting(log: CallLog) -> Self {
        Self {
            log,
            fail_with: None,
        }
    }

    pub fn failing(log: CallLog, error: AvatarStoreError) -> Self {
        Self {
            log,
            fail_with: Some(error),
        }
    }
}

#[async_trait]
impl AvatarStore for RecordingAvatars {
    async fn upload(
        &self,
        path: &AvatarPath,
        upload: &AvatarUpload,
    ) -> Result<(), AvatarStoreError> {
        self.log.push(Call::Upload {
            path: path.as_str().to_owned(),
            bytes: upload.bytes().to_vec(),
        });
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Reservation store assigning a fixed id and accepting every write.
pub struct RecordingReservations {
    log: CallLog,
    next_id: Uuid,
}

impl RecordingReservations {
    pub fn new(log: CallLog, next_id: Uuid) -> Self {
        Self { log, next_id }
    }

    fn row(owner: &UserId, id: Uuid, draft: &ReservationDraft) -> Reservation {
        Reservation {
            id,
            owner: owner.clone(),
            pet_id: draft.pet_id(),
            name: draft.name().to_owned(),
            date: draft.date(),
            time: draft.time(),
            service: draft.service(),
            created_at: stored_at(),
        }
    }
}

#[async_trait]
impl ReservationRepository for RecordingReservations {
    async fn insert(
        &self,
        owner: &UserId,
        draft: &ReservationDraft,
    ) -> Result<Reservation, ReservationRepositoryError> {
        self.log.push(Call::InsertReservation {
            pet_id: draft.pet_id(),
        });
        Ok(Self::row(owner, self.next_id, draft))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &Uuid,
        draft: &ReservationDraft,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        self.log.push(Call::UpdateReservation { id: *id });
        Ok(Some(Self::row(owner, *id, draft)))
    }

    async fn delete(
        &self,
        _owner: &UserId,
        id: &Uuid,
    ) -> Result<DeleteStatus, ReservationRepositoryError> {
        self.log.push(Call::DeleteReservation { id: *id });
        Ok(DeleteStatus::Deleted)
    }

    async fn list_with_pets(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<PetReservations>, ReservationRepositoryError> {
        Ok(Vec::new())
    }
}

/// Handler state running the real services over recording adapters.
pub fn recording_state(
    pets: RecordingPets,
    avatars: RecordingAvatars,
    reservations: RecordingReservations,
    max_avatar_bytes: usize,
) -> web::Data<HttpState> {
    let pet_service = Arc::new(PetMutationService::new(Arc::new(pets), Arc::new(avatars)));
    let reservation_service = Arc::new(ReservationMutationService::new(Arc::new(reservations)));
    let ports = HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        pets: pet_service.clone(),
        pets_query: pet_service,
        reservations: reservation_service.clone(),
        reservations_query: reservation_service,
    };
    web::Data::new(HttpState::new(ports, max_avatar_bytes))
}

/// The `/api/v1` surface wrapped in tracing and cookie sessions.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    App::new().app_data(state).wrap(Trace).service(
        web::scope("/api/v1")
            .wrap(session)
            .service(login)
            .service(relink_pet_avatar)
            .service(pets_resource())
            .service(reservations_resource()),
    )
}

/// Log in with the fixture credentials and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "fixture login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

pub const BOUNDARY: &str = "pawsplay-integration-boundary";

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
