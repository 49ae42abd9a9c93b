//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every handler's path, the inbound schema wrappers and
//! the session cookie security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::health::{ProbeBody, StoreBackend};
use crate::inbound::http::pets::PetBody;
use crate::inbound::http::reservations::{PetReservationsBody, ReservationBody};
use crate::inbound::http::schemas::{
    AvatarFormSchema, ErrorCodeSchema, ErrorSchema, MutationOutcomeBody, PetFormSchema,
    ReservationFormSchema,
};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pawsplay API",
        description = "Pet profiles, reservations and avatar uploads for daycare customers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::pets::list_pets,
        crate::inbound::http::pets::mutate_pet,
        crate::inbound::http::pets::relink_pet_avatar,
        crate::inbound::http::reservations::list_reservations,
        crate::inbound::http::reservations::mutate_reservation,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        MutationOutcomeBody,
        PetBody,
        PetFormSchema,
        AvatarFormSchema,
        ReservationBody,
        PetReservationsBody,
        ReservationFormSchema,
        ProbeBody,
        StoreBackend,
    )),
    tags(
        (name = "users", description = "Session login and logout"),
        (name = "pets", description = "Pet profiles and avatars"),
        (name = "reservations", description = "Service bookings"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        let error_schema = schemas.get("crate.domain.Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn outcome_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let outcome = schemas
            .get("MutationOutcomeBody")
            .expect("outcome schema");

        assert_object_schema_has_field(outcome, "success");
        assert_object_schema_has_field(outcome, "avatarPath");
    }

    #[rstest]
    #[case("/api/v1/pets")]
    #[case("/api/v1/pets/{id}/avatar")]
    #[case("/api/v1/reservations")]
    #[case("/api/v1/login")]
    #[case("/health/ready")]
    fn registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn pet_mutations_document_every_verb() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/pets").expect("pets path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
