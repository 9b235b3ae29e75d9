//! Account and session HTTP handlers.
//!
//! ```text
//! POST /api/v1/users {"username":"ada","displayName":"Ada Lovelace","password":"..."}
//! POST /api/v1/login {"username":"ada","password":"..."}
//! GET  /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::NewAccount;
use crate::domain::{
    DisplayName, Error, LoginCredentials, LoginValidationError, User, UserValidationError,
    Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    pub username: String,
    pub display_name: String,
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    pub username: String,
    pub password: String,
}

fn map_user_validation_error(field: &str, err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let username = Username::new(body.username)
        .map_err(|err| map_user_validation_error("username", err))?;
    let display_name = DisplayName::new(body.display_name)
        .map_err(|err| map_user_validation_error("displayName", err))?;
    if body.password.is_empty() {
        return Err(Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })));
    }

    let user = state
        .accounts
        .register(NewAccount {
            username,
            display_name,
            password: body.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(body.username, body.password)
        .map_err(map_login_validation_error)?;
    let identity = state.login.authenticate(&credentials).await?;
    session.persist_identity(&identity)?;
    Ok(HttpResponse::Ok().finish())
}

/// Profile of the authenticated caller, including the points balance.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.current_user(user_id).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountsCommand, MockLoginService};
    use crate::domain::{Identity, UserId};
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use std::sync::Arc;

    fn fixture_user(id: &UserId) -> User {
        User::new(
            id.clone(),
            Username::new("ada").expect("valid username"),
            DisplayName::new("Ada Lovelace").expect("valid display name"),
            100,
            false,
            Utc::now(),
        )
        .expect("valid user")
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
            .service(register)
            .service(login)
            .service(current_user)
    }

    #[actix_web::test]
    async fn register_returns_created_user() {
        let user_id = UserId::random();
        let created = fixture_user(&user_id);
        let mut accounts = MockAccountsCommand::new();
        accounts
            .expect_register()
            .times(1)
            .return_once(move |_| Ok(created));

        let state = HttpState {
            accounts: Arc::new(accounts),
            ..HttpState::fixtures()
        };
        let app = test::init_service(app_with_state(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/users")
                .set_json(&RegisterRequestBody {
                    username: "ada".to_owned(),
                    display_name: "Ada Lovelace".to_owned(),
                    password: "correct horse".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn register_rejects_invalid_username_before_the_port() {
        // Fixture accounts port would 503; validation must fail first.
        let app = test::init_service(app_with_state(HttpState::fixtures())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/users")
                .set_json(&RegisterRequestBody {
                    username: "Ada Lovelace".to_owned(),
                    display_name: "Ada Lovelace".to_owned(),
                    password: "pw".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn login_sets_a_session_cookie() {
        let user_id = UserId::random();
        let mut login_service = MockLoginService::new();
        let identity = Identity::user(user_id.clone());
        login_service
            .expect_authenticate()
            .times(1)
            .return_once(move |_| Ok(identity));

        let mut accounts = MockAccountsCommand::new();
        let profile = fixture_user(&user_id);
        accounts
            .expect_current_user()
            .times(1)
            .return_once(move |_| Ok(profile));

        let state = HttpState {
            login: Arc::new(login_service),
            accounts: Arc::new(accounts),
            ..HttpState::fixtures()
        };
        let app = test::init_service(app_with_state(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(&LoginRequestBody {
                    username: "ada".to_owned(),
                    password: "correct horse".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["points"], 100);
    }

    #[actix_web::test]
    async fn current_user_requires_a_session() {
        let app = test::init_service(app_with_state(HttpState::fixtures())).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/users/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
