//! Item catalogue HTTP handlers.
//!
//! ```text
//! POST   /api/v1/items
//! GET    /api/v1/items
//! GET    /api/v1/items/{id}
//! DELETE /api/v1/items/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Item, ItemDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Listing request body for `POST /api/v1/items`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequestBody {
    pub title: String,
    pub description: String,
    pub category: String,
    pub size: String,
    pub condition: String,
    pub points_value: i64,
}

impl From<CreateItemRequestBody> for ItemDraft {
    fn from(value: CreateItemRequestBody) -> Self {
        Self {
            title: value.title,
            description: value.description,
            category: value.category,
            size: value.size,
            condition: value.condition,
            points_value: value.points_value,
        }
    }
}

/// List a new item owned by the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequestBody,
    responses(
        (status = 201, description = "Item listed", body = Item),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateItemRequestBody>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let body = payload.into_inner();
    if body.points_value < 0 {
        return Err(Error::invalid_request("points value must not be negative")
            .with_details(json!({ "field": "pointsValue" })));
    }

    let item = state
        .items_command
        .create_item(owner, ItemDraft::from(body))
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// Browse all listed items.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Items", body = [Item])
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Item>>> {
    let items = state.items_query.list_items().await?;
    Ok(web::Json(items))
}

/// A single item by id.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = Item),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Item>> {
    let item = state.items_query.get_item(path.into_inner()).await?;
    Ok(web::Json(item))
}

/// Remove a listing as its owner or an administrator.
///
/// Items reserved by a pending swap cannot be deleted until the swap is
/// resolved.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Item reserved by a pending swap", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    state
        .items_command
        .delete_item(actor, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockItemsCommand, MockItemsQuery};
    use crate::domain::{Identity, UserId};
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use std::sync::Arc;

    fn fixture_item(owner: &UserId) -> Item {
        Item::new(
            Uuid::new_v4(),
            owner.clone(),
            ItemDraft {
                title: "Wool coat".to_owned(),
                description: "Barely worn".to_owned(),
                category: "outerwear".to_owned(),
                size: "M".to_owned(),
                condition: "good".to_owned(),
                points_value: 50,
            },
            Utc::now(),
        )
        .expect("valid item")
    }

    fn app_with_state(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .route(
                "/test-login",
                web::get().to(|session: SessionContext| async move {
                    session.persist_identity(&Identity::user(UserId::random()))?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .service(create_item)
            .service(list_items)
            .service(get_item)
            .service(delete_item)
    }

    async fn session_cookie<S>(app: &S) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    {
        let res = test::call_service(
            app,
            test::TestRequest::get().uri("/test-login").to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn listing_is_public() {
        let owner = UserId::random();
        let items = vec![fixture_item(&owner)];
        let mut query = MockItemsQuery::new();
        query
            .expect_list_items()
            .times(1)
            .return_once(move || Ok(items));

        let state = HttpState {
            items_query: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = test::init_service(app_with_state(state)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/items").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body[0]["status"], "available");
    }

    #[actix_web::test]
    async fn creating_requires_a_session() {
        let app = test::init_service(app_with_state(HttpState::fixtures())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/items")
                .set_json(&CreateItemRequestBody {
                    title: "Coat".to_owned(),
                    description: "Nice".to_owned(),
                    category: "outerwear".to_owned(),
                    size: "M".to_owned(),
                    condition: "good".to_owned(),
                    points_value: 10,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn creating_rejects_negative_points_value() {
        let app = test::init_service(app_with_state(HttpState::fixtures())).await;
        let cookie = session_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/items")
                .cookie(cookie)
                .set_json(&CreateItemRequestBody {
                    title: "Coat".to_owned(),
                    description: "Nice".to_owned(),
                    category: "outerwear".to_owned(),
                    size: "M".to_owned(),
                    condition: "good".to_owned(),
                    points_value: -5,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn deleting_a_reserved_item_maps_to_bad_request() {
        let mut command = MockItemsCommand::new();
        command
            .expect_delete_item()
            .times(1)
            .return_once(|_, _| Err(Error::item_unavailable("Item is reserved by a pending swap")));

        let state = HttpState {
            items_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = test::init_service(app_with_state(state)).await;
        let cookie = session_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/items/{}", Uuid::new_v4()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_item_is_not_found() {
        let app = test::init_service(app_with_state(HttpState::fixtures())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/items/{}", Uuid::new_v4()))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
