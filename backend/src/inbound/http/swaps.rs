//! Swap workflow HTTP handlers.
//!
//! ```text
//! POST   /api/v1/swaps
//! GET    /api/v1/swaps
//! PUT    /api/v1/swaps/{id}/respond
//! DELETE /api/v1/swaps/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{RequestSwapPayload, SwapView};
use crate::domain::{Error, Swap, SwapAction};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/swaps`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestSwapBody {
    pub requested_item_id: Uuid,
    pub offered_item_id: Option<Uuid>,
    pub points_offered: Option<i64>,
}

/// Request body for `PUT /api/v1/swaps/{id}/respond`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondToSwapBody {
    /// Either `accept` or `reject`.
    pub action: String,
}

/// Open a swap against an available item.
#[utoipa::path(
    post,
    path = "/api/v1/swaps",
    request_body = RequestSwapBody,
    responses(
        (status = 201, description = "Swap requested", body = Swap),
        (status = 400, description = "Precondition failed", body = Error),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "requestSwap"
)]
#[post("/swaps")]
pub async fn request_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RequestSwapBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let body = payload.into_inner();

    let points_offered = body.points_offered.unwrap_or(0);
    if points_offered < 0 {
        return Err(Error::invalid_request("points offered must not be negative")
            .with_details(json!({ "field": "pointsOffered" })));
    }

    let swap = state
        .swap_command
        .request_swap(RequestSwapPayload {
            requester,
            requested_item: body.requested_item_id,
            offered_item: body.offered_item_id,
            points_offered,
        })
        .await?;
    Ok(HttpResponse::Created().json(swap))
}

/// All swaps involving the authenticated caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/swaps",
    responses(
        (status = 200, description = "Swaps with summaries resolved", body = [SwapView]),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "listSwaps"
)]
#[get("/swaps")]
pub async fn list_swaps(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SwapView>>> {
    let user_id = session.require_user_id()?;
    let swaps = state.swap_query.list_swaps(user_id).await?;
    Ok(web::Json(swaps))
}

/// Accept or reject a pending swap as its recipient.
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/respond",
    params(("id" = Uuid, Path, description = "Swap id")),
    request_body = RespondToSwapBody,
    responses(
        (status = 200, description = "Swap resolved", body = Swap),
        (status = 400, description = "Invalid action", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Responder is not the recipient", body = Error),
        (status = 404, description = "Swap not found", body = Error),
        (status = 409, description = "Swap already processed", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "respondToSwap"
)]
#[put("/swaps/{id}/respond")]
pub async fn respond_to_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<RespondToSwapBody>,
) -> ApiResult<web::Json<Swap>> {
    let responder = session.require_user_id()?;
    let action = SwapAction::from_str(payload.action.as_str()).map_err(|err| {
        Error::invalid_action(err.to_string()).with_details(json!({ "field": "action" }))
    })?;

    let swap = state
        .swap_command
        .respond_to_swap(responder, path.into_inner(), action)
        .await?;
    Ok(web::Json(swap))
}

/// Cancel a pending swap as its requester or an administrator.
#[utoipa::path(
    delete,
    path = "/api/v1/swaps/{id}",
    params(("id" = Uuid, Path, description = "Swap id")),
    responses(
        (status = 200, description = "Swap cancelled", body = Swap),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller may not cancel this swap", body = Error),
        (status = 404, description = "Swap not found", body = Error),
        (status = 409, description = "Swap already processed", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "cancelSwap"
)]
#[delete("/swaps/{id}")]
pub async fn cancel_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Swap>> {
    let actor = session.require_identity()?;
    let swap = state.swap_command.cancel_swap(actor, path.into_inner()).await?;
    Ok(web::Json(swap))
}
