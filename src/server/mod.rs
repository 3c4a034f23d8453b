mod account;
mod admin;
pub mod dto;
pub mod response;
mod router;
mod trips;
pub mod validation;
mod weather;

pub use admin::admin_router;
pub use router::{AppState, create_router};
