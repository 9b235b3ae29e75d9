//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, FixtureAccountsCommand, FixtureItemsCommand, FixtureItemsQuery,
    FixtureLoginService, FixtureSwapCommand, FixtureSwapQuery, ItemsCommand, ItemsQuery,
    LoginService, SwapCommand, SwapQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub items_command: Arc<dyn ItemsCommand>,
    pub items_query: Arc<dyn ItemsQuery>,
    pub swap_command: Arc<dyn SwapCommand>,
    pub swap_query: Arc<dyn SwapQuery>,
}

impl HttpState {
    /// State wired entirely with fixtures; useful as a test baseline with
    /// individual ports swapped out per case.
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            accounts: Arc::new(FixtureAccountsCommand),
            items_command: Arc::new(FixtureItemsCommand),
            items_query: Arc::new(FixtureItemsQuery),
            swap_command: Arc::new(FixtureSwapCommand),
            swap_query: Arc::new(FixtureSwapQuery),
        }
    }
}
