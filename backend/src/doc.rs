//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every account and health endpoint, the request and
//! response bodies, and the session cookie security scheme. Swagger UI serves
//! it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::accounts::{
    AccountIdBody, AccountSummaryBody, CreateAccountBody, LoginBody, UpdateAccountBody,
};

/// Enrich the generated document with the session cookie security scheme.
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
        title = "Account service API",
        description = "Account registration, login, profile updates and soft deletion."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        AccountSummaryBody,
        AccountIdBody,
        CreateAccountBody,
        LoginBody,
        UpdateAccountBody
    )),
    tags(
        (name = "accounts", description = "Account lifecycle and login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
