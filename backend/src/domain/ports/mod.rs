//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod item_store;
mod items_command;
mod items_query;
mod login_service;
mod swap_command;
mod swap_query;
mod swap_store;
mod user_store;

#[cfg(test)]
pub use accounts::MockAccountsCommand;
pub use accounts::{AccountsCommand, FixtureAccountsCommand, NewAccount};
#[cfg(test)]
pub use item_store::MockItemStore;
pub use item_store::{FixtureItemStore, ItemStore, ItemStoreError};
#[cfg(test)]
pub use items_command::MockItemsCommand;
pub use items_command::{FixtureItemsCommand, ItemsCommand};
#[cfg(test)]
pub use items_query::MockItemsQuery;
pub use items_query::{FixtureItemsQuery, ItemsQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use swap_command::MockSwapCommand;
pub use swap_command::{FixtureSwapCommand, RequestSwapPayload, SwapCommand};
#[cfg(test)]
pub use swap_query::MockSwapQuery;
pub use swap_query::{FixtureSwapQuery, ItemSummary, SwapQuery, SwapView, UserSummary};
#[cfg(test)]
pub use swap_store::MockSwapStore;
pub use swap_store::{FixtureSwapStore, SwapStore, SwapStoreError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{
    FixtureUserStore, LoginRecord, NewUserRecord, UserStore, UserStoreError,
};
