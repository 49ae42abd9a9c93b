//! Pet HTTP handlers.
//!
//! ```text
//! GET    /api/v1/pets
//! POST   /api/v1/pets              name, age, breed, type, avatar
//! PUT    /api/v1/pets              id, name, age, breed, type, avatar
//! DELETE /api/v1/pets              id
//! POST   /api/v1/pets/{id}/avatar  avatar
//! ```
//!
//! The method is resolved before the body is read, so an unsupported verb is
//! answered with 405 without touching the payload or any port.

use actix_web::{HttpRequest, HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{AvatarRelinkRequest, PetMutationRequest};
use crate::domain::{
    Error, MutationVerb, Pet, PetChange, PetDraft, PetKind, PetValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::{FormPayload, FormSpec, ID, read_form};
use crate::inbound::http::schemas::{
    AvatarFormSchema, ErrorSchema, MutationOutcomeBody, PetFormSchema, outcome_response,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_choice, parse_non_negative, parse_uuid,
};

const NAME: FieldName = FieldName::new("name");
const AGE: FieldName = FieldName::new("age");
const BREED: FieldName = FieldName::new("breed");
const TYPE: FieldName = FieldName::new("type");
const AVATAR: FieldName = FieldName::new("avatar");

const PET_FIELDS: &[FieldName] = &[ID, NAME, AGE, BREED, TYPE];

/// Pet as rendered to its owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetBody {
    /// Record id.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: u16,
    pub breed: String,
    /// `Dog` or `Cat`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Storage key of the linked avatar, `<owner>/<pet>/avatar`.
    pub avatar_path: Option<String>,
    /// When the record was first stored.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<Pet> for PetBody {
    fn from(value: Pet) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            age: value.age,
            breed: value.breed,
            kind: value.kind.map(|kind| kind.as_str().to_owned()),
            avatar_path: value.avatar_path.map(String::from),
            created_at: value.created_at,
        }
    }
}

fn map_pet_validation_error(err: PetValidationError) -> Error {
    match err {
        PetValidationError::EmptyName => missing_field_error(NAME),
        PetValidationError::EmptyBreed => missing_field_error(BREED),
    }
}

/// Promote the text fields and optional avatar into a [`PetChange`].
fn decode_pet_change(form: &mut FormPayload) -> Result<PetChange, Error> {
    let draft = {
        let name = form.require(NAME)?;
        let age = parse_non_negative(form.require(AGE)?, AGE)?;
        let breed = form.require(BREED)?;
        let kind = form
            .optional(TYPE)
            .map(|value| parse_choice::<PetKind>(value, TYPE, "Dog|Cat"))
            .transpose()?;
        PetDraft::new(name, age, breed, kind).map_err(map_pet_validation_error)?
    };
    Ok(PetChange {
        draft,
        avatar: form.take_file(),
    })
}

/// List the caller's pets.
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    responses(
        (status = 200, description = "Pets owned by the caller", body = [PetBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "listPets",
    security(("SessionCookie" = []))
)]
pub async fn list_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PetBody>>> {
    let owner = session.require_user_id()?;
    let pets = state.pets_query.list_pets(&owner).await?;
    Ok(web::Json(pets.into_iter().map(PetBody::from).collect()))
}

/// Create, replace or delete a pet.
///
/// `POST` creates, `PUT` replaces the record named by `id`, `DELETE` removes
/// it. An attached `avatar` is stored at `<owner>/<pet>/avatar` and linked
/// after the record write; if that step fails the response is 502 with the
/// stored `recordId` so the client can retry via the avatar endpoint.
#[utoipa::path(
    method(post, put, delete),
    path = "/api/v1/pets",
    request_body(content = PetFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Pet created", body = MutationOutcomeBody),
        (status = 200, description = "Pet updated or deleted", body = MutationOutcomeBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Pet not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema),
        (status = 502, description = "Pet stored but avatar not linked", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "mutatePet",
    security(("SessionCookie" = []))
)]
pub async fn mutate_pet(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let verb = MutationVerb::from_method(req.method().as_str())?;
    let owner = session.require_user_id()?;
    let spec = FormSpec {
        fields: PET_FIELDS,
        file: Some(AVATAR),
        max_file_bytes: state.max_avatar_bytes,
    };
    let mutation = read_form(&req, payload, &spec)
        .await?
        .into_mutation(verb, decode_pet_change)?;
    let outcome = state
        .pets
        .apply(PetMutationRequest { owner, mutation })
        .await?;
    Ok(outcome_response(outcome))
}

/// Re-run the avatar upload and link for an existing pet.
///
/// The storage path is fixed per pet, so repeating the call is safe.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{id}/avatar",
    params(("id" = uuid::Uuid, Path, description = "Pet identifier")),
    request_body(content = AvatarFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar linked", body = MutationOutcomeBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Pet not found", body = ErrorSchema),
        (status = 502, description = "Avatar not linked", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "relinkPetAvatar",
    security(("SessionCookie" = []))
)]
#[post("/pets/{id}/avatar")]
pub async fn relink_pet_avatar(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let pet_id = parse_uuid(&path.into_inner(), ID)?;
    let spec = FormSpec {
        fields: &[],
        file: Some(AVATAR),
        max_file_bytes: state.max_avatar_bytes,
    };
    let avatar = read_form(&req, payload, &spec)
        .await?
        .take_file()
        .ok_or_else(|| missing_field_error(AVATAR))?;
    let outcome = state
        .pets
        .relink_avatar(AvatarRelinkRequest {
            owner,
            pet_id,
            avatar,
        })
        .await?;
    Ok(outcome_response(outcome))
}

/// `/pets`: `GET` lists, every other method goes through the mutation
/// pipeline, which answers 405 for anything but `POST`, `PUT` and `DELETE`.
pub fn pets_resource() -> actix_web::Resource {
    web::resource("/pets")
        .route(web::get().to(list_pets))
        .default_service(web::to(mutate_pet))
}
