//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (contacts, users,
//!   health)
//! - **Schemas**: Request and response bodies plus domain type wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::inbound::http::contacts::{ContactRequest, ContactResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{AvatarRequest, UserResponse};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by every protected path.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.description =
            Some("Opaque access token issued by `contacts-admin rotate-token`.".to_owned());
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contacts API",
        description = "Owner-scoped contact management with search and upcoming birthdays.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::upcoming_birthdays,
        crate::inbound::http::contacts::search_contacts,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_avatar,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ContactRequest,
        ContactResponse,
        UserResponse,
        AvatarRequest,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "contacts", description = "Contact records owned by the caller"),
        (name = "users", description = "The caller's account"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
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
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn openapi_contact_response_uses_snake_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let contact = schemas.get("ContactResponse").expect("ContactResponse schema");

        assert_object_schema_has_field(contact, "born_date");
        assert_object_schema_has_field(contact, "surname");
    }

    #[test]
    fn openapi_error_responses_reference_error_schema() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("document serialises");
        let expected = format!("#/components/schemas/{ERROR_SCHEMA_NAME}");

        for (path, method, status) in [
            ("/api/contacts", "get", "400"),
            ("/api/contacts/{contact_id}", "delete", "404"),
            ("/api/contacts/search/{credentials}", "get", "404"),
            ("/api/users/avatar", "patch", "400"),
        ] {
            let reference = &json["paths"][path][method]["responses"][status]["content"]
                ["application/json"]["schema"]["$ref"];
            assert_eq!(
                reference.as_str(),
                Some(expected.as_str()),
                "{method} {path} {status}"
            );
        }
    }

    #[test]
    fn openapi_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");

        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[test]
    fn openapi_lists_contact_routes() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/contacts",
            "/api/contacts/{contact_id}",
            "/api/contacts/search/{credentials}",
            "/api/contacts/birthday/",
            "/api/users/me",
            "/health/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
