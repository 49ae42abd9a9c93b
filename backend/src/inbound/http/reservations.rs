//! Reservation HTTP handlers.
//!
//! ```text
//! GET    /api/v1/reservations
//! POST   /api/v1/reservations   pet_id, name, date, time, service
//! PUT    /api/v1/reservations   id, pet_id, name, date, time, service
//! DELETE /api/v1/reservations   id
//! ```
//!
//! Reservations carry no attachment, so the outcome's `avatarPath` is
//! always null.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::ReservationMutationRequest;
use crate::domain::{
    CareService, Error, MutationVerb, PetReservations, Reservation, ReservationDraft,
    ReservationValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::{FormPayload, FormSpec, ID, read_form};
use crate::inbound::http::pets::PetBody;
use crate::inbound::http::schemas::{
    ErrorSchema, MutationOutcomeBody, ReservationFormSchema, outcome_response,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_choice, parse_date, parse_time, parse_uuid,
};

const PET_ID: FieldName = FieldName::new("pet_id");
const NAME: FieldName = FieldName::new("name");
const DATE: FieldName = FieldName::new("date");
const TIME: FieldName = FieldName::new("time");
const SERVICE: FieldName = FieldName::new("service");

const RESERVATION_FIELDS: &[FieldName] = &[ID, PET_ID, NAME, DATE, TIME, SERVICE];

/// Reservation as rendered to its owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationBody {
    /// Record id.
    #[schema(format = "uuid")]
    pub id: String,
    /// Pet the reservation is for.
    #[schema(format = "uuid")]
    pub pet_id: String,
    /// Free-form label chosen by the owner.
    pub name: String,
    /// Calendar day, `YYYY-MM-DD`.
    #[schema(example = "2026-05-04")]
    pub date: String,
    /// Drop-off time, `HH:MM:SS`.
    #[schema(example = "08:30:00")]
    pub time: String,
    /// `daycare`, `grooming` or `boarding`.
    pub service: String,
    /// When the record was first stored.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationBody {
    fn from(value: Reservation) -> Self {
        Self {
            id: value.id.to_string(),
            pet_id: value.pet_id.to_string(),
            name: value.name,
            date: value.date.format("%Y-%m-%d").to_string(),
            time: value.time.format("%H:%M:%S").to_string(),
            service: value.service.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}

/// A pet with its bookings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetReservationsBody {
    pub pet: PetBody,
    pub reservations: Vec<ReservationBody>,
}

impl From<PetReservations> for PetReservationsBody {
    fn from(value: PetReservations) -> Self {
        Self {
            pet: PetBody::from(value.pet),
            reservations: value
                .reservations
                .into_iter()
                .map(ReservationBody::from)
                .collect(),
        }
    }
}

fn map_reservation_validation_error(err: ReservationValidationError) -> Error {
    match err {
        ReservationValidationError::EmptyName => missing_field_error(NAME),
    }
}

fn decode_reservation_draft(form: &mut FormPayload) -> Result<ReservationDraft, Error> {
    let pet_id = parse_uuid(form.require(PET_ID)?, PET_ID)?;
    let name = form.require(NAME)?;
    let date = parse_date(form.require(DATE)?, DATE)?;
    let time = parse_time(form.require(TIME)?, TIME)?;
    let service = parse_choice::<CareService>(
        form.require(SERVICE)?,
        SERVICE,
        "daycare|grooming|boarding",
    )?;
    ReservationDraft::new(pet_id, name, date, time, service)
        .map_err(map_reservation_validation_error)
}

/// List the caller's pets joined with their reservations.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    responses(
        (status = 200, description = "Pets with their reservations", body = [PetReservationsBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["reservations"],
    operation_id = "listReservations",
    security(("SessionCookie" = []))
)]
pub async fn list_reservations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PetReservationsBody>>> {
    let owner = session.require_user_id()?;
    let grouped = state.reservations_query.list_pet_reservations(&owner).await?;
    Ok(web::Json(
        grouped.into_iter().map(PetReservationsBody::from).collect(),
    ))
}

/// Create, replace or delete a reservation.
///
/// `pet_id` must name one of the caller's pets; anything else is rejected by
/// the store as a constraint violation.
#[utoipa::path(
    method(post, put, delete),
    path = "/api/v1/reservations",
    request_body(content = ReservationFormSchema, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Reservation created", body = MutationOutcomeBody),
        (status = 200, description = "Reservation updated or deleted", body = MutationOutcomeBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Reservation not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["reservations"],
    operation_id = "mutateReservation",
    security(("SessionCookie" = []))
)]
pub async fn mutate_reservation(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let verb = MutationVerb::from_method(req.method().as_str())?;
    let owner = session.require_user_id()?;
    let spec = FormSpec {
        fields: RESERVATION_FIELDS,
        file: None,
        max_file_bytes: 0,
    };
    let mutation = read_form(&req, payload, &spec)
        .await?
        .into_mutation(verb, decode_reservation_draft)?;
    let outcome = state
        .reservations
        .apply(ReservationMutationRequest { owner, mutation })
        .await?;
    Ok(outcome_response(outcome))
}

/// `/reservations`: `GET` lists, everything else is a mutation.
pub fn reservations_resource() -> actix_web::Resource {
    web::resource("/reservations")
        .route(web::get().to(list_reservations))
        .default_service(web::to(mutate_reservation))
}
