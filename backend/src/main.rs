//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::domain::{AccountsService, ItemService, SwapService};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{accounts, items, swaps};
use backend::outbound::persistence::{
    DbPool, DieselItemStore, DieselSwapStore, DieselUserStore, PoolConfig,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SIGNUP_BONUS: i64 = 100;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let signup_bonus = match env::var("SIGNUP_BONUS_POINTS") {
        Ok(raw) => raw.parse::<i64>().map_err(|e| {
            std::io::Error::other(format!("invalid SIGNUP_BONUS_POINTS {raw:?}: {e}"))
        })?,
        Err(_) => DEFAULT_SIGNUP_BONUS,
    };

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;

    let state = build_state(&pool, signup_bonus);

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .app_data(web::Data::new(state.clone()))
            .service(accounts::register)
            .service(accounts::login)
            .service(accounts::current_user)
            .service(items::create_item)
            .service(items::list_items)
            .service(items::get_item)
            .service(items::delete_item)
            .service(swaps::request_swap)
            .service(swaps::list_swaps)
            .service(swaps::respond_to_swap)
            .service(swaps::cancel_swap);

        let app = App::new()
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Wire persistence adapters into the domain services and HTTP state.
fn build_state(pool: &DbPool, signup_bonus: i64) -> HttpState {
    let item_store = Arc::new(DieselItemStore::new(pool.clone()));
    let user_store = Arc::new(DieselUserStore::new(pool.clone()));
    let swap_store = Arc::new(DieselSwapStore::new(pool.clone()));

    let swap_service = Arc::new(SwapService::new(
        item_store.clone(),
        user_store.clone(),
        swap_store,
    ));
    let item_service = Arc::new(ItemService::new(item_store));
    let accounts_service = Arc::new(AccountsService::new(user_store, signup_bonus));

    HttpState {
        login: accounts_service.clone(),
        accounts: accounts_service,
        items_command: item_service.clone(),
        items_query: item_service,
        swap_command: swap_service.clone(),
        swap_query: swap_service,
    }
}
