//! Route definitions for the tickerdesk API

mod auth;
mod stocks;

pub use auth::auth_routes;
pub use stocks::stock_routes;
