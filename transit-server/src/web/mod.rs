//! Web layer for the transit route planner.
//!
//! A thin adapter carrying the query and mutation contracts over HTTP;
//! everything interesting happens in `graph` and `planner`.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
