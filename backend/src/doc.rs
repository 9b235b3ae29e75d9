//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: the account, item, and swap endpoints plus health
//! probes, together with the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{ItemSummary, SwapView, UserSummary};
use crate::domain::{Error, ErrorCode, Item, ItemStatus, Swap, SwapAction, SwapStatus, User};
use crate::inbound::http::accounts::{LoginRequestBody, RegisterRequestBody};
use crate::inbound::http::items::CreateItemRequestBody;
use crate::inbound::http::swaps::{RequestSwapBody, RespondToSwapBody};

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
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Item exchange backend API",
        description = "HTTP interface for listing items and negotiating swaps."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::swaps::request_swap,
        crate::inbound::http::swaps::list_swaps,
        crate::inbound::http::swaps::respond_to_swap,
        crate::inbound::http::swaps::cancel_swap,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Item,
        ItemStatus,
        Swap,
        SwapStatus,
        SwapAction,
        SwapView,
        UserSummary,
        ItemSummary,
        RegisterRequestBody,
        LoginRequestBody,
        CreateItemRequestBody,
        RequestSwapBody,
        RespondToSwapBody,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and profiles"),
        (name = "items", description = "Item catalogue operations"),
        (name = "swaps", description = "Swap negotiation workflow"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
