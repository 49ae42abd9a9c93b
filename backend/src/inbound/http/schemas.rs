//! OpenAPI schema definitions for domain types and form payloads.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their shape for documentation only, alongside the
//! response body every mutation endpoint shares.

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{MutationAction, MutationOutcome};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request method is not one of `POST`, `PUT` or `DELETE`.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// The request conflicts with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The record was stored but its avatar was not.
    #[schema(rename = "attachment_failed")]
    AttachmentFailed,
    /// A backing service is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "age must be a non-negative integer")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as `recordId` and `stage` for
    /// `attachment_failed`.
    details: Option<serde_json::Value>,
}

/// Form fields accepted by the pet mutation endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PetFormSchema {
    /// Required for `PUT` and `DELETE`.
    #[schema(format = "uuid")]
    id: Option<String>,
    #[schema(example = "Biscuit")]
    name: Option<String>,
    #[schema(example = "3")]
    age: Option<String>,
    #[schema(example = "Beagle")]
    breed: Option<String>,
    /// `Dog` or `Cat`.
    #[schema(example = "Dog")]
    r#type: Option<String>,
    /// Image stored at `<owner>/<pet>/avatar`.
    #[schema(value_type = Option<String>, format = Binary)]
    avatar: Option<Vec<u8>>,
}

/// Form fields accepted by the avatar repair endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AvatarFormSchema {
    #[schema(value_type = String, format = Binary)]
    avatar: Vec<u8>,
}

/// Form fields accepted by the reservation mutation endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReservationFormSchema {
    /// Required for `PUT` and `DELETE`.
    #[schema(format = "uuid")]
    id: Option<String>,
    #[schema(format = "uuid")]
    pet_id: Option<String>,
    #[schema(example = "Morning drop-off")]
    name: Option<String>,
    #[schema(example = "2026-05-04")]
    date: Option<String>,
    #[schema(example = "08:30")]
    time: Option<String>,
    /// `daycare`, `grooming` or `boarding`.
    #[schema(example = "daycare")]
    service: Option<String>,
}

/// Success body shared by every mutation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcomeBody {
    /// Always `true`; failures use the error payload instead.
    pub success: bool,
    /// `created`, `updated` or `deleted`.
    #[schema(example = "created")]
    pub action: String,
    #[schema(format = "uuid")]
    pub id: String,
    /// Linked avatar path when this request attached one.
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000/3fa85f64-5717-4562-b3fc-2c963f66afa6/avatar")]
    pub avatar_path: Option<String>,
}

impl From<MutationOutcome> for MutationOutcomeBody {
    fn from(value: MutationOutcome) -> Self {
        Self {
            success: true,
            action: value.action.as_str().to_owned(),
            id: value.id.to_string(),
            avatar_path: value.avatar_path.map(String::from),
        }
    }
}

/// Render a mutation outcome: 201 for a create, 200 otherwise.
pub(crate) fn outcome_response(outcome: MutationOutcome) -> HttpResponse {
    let mut response = match outcome.action {
        MutationAction::Created => HttpResponse::Created(),
        MutationAction::Updated | MutationAction::Deleted => HttpResponse::Ok(),
    };
    response.json(MutationOutcomeBody::from(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvatarPath, UserId};
    use serde_json::{Value, json};
    use utoipa::PartialSchema;
    use uuid::Uuid;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_has_expected_name() {
        let name = ErrorSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("trace_id"), "missing trace_id field");
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "method_not_allowed",
            "conflict",
            "attachment_failed",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn pet_form_documents_type_field() {
        let schema_json = schema_to_json::<PetFormSchema>();
        assert!(schema_json.contains("\"type\""), "pet kind is sent as `type`");
        assert!(schema_json.contains("binary"), "avatar is a file part");
    }

    #[test]
    fn outcome_body_serialises_camel_case() {
        let id = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
        let owner = UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("owner");
        let outcome = MutationOutcome::new(MutationAction::Updated, id)
            .with_avatar(AvatarPath::for_entity(&owner, &id));

        let value: Value =
            serde_json::to_value(MutationOutcomeBody::from(outcome)).expect("serialise");

        assert_eq!(
            value,
            json!({
                "success": true,
                "action": "updated",
                "id": id.to_string(),
                "avatarPath": format!("{owner}/{id}/avatar"),
            })
        );
    }

    #[test]
    fn outcome_body_keeps_null_avatar() {
        let outcome = MutationOutcome::new(MutationAction::Deleted, Uuid::nil());
        let value: Value =
            serde_json::to_value(MutationOutcomeBody::from(outcome)).expect("serialise");
        assert_eq!(value["avatarPath"], Value::Null);
        assert_eq!(value["action"], "deleted");
    }
}
