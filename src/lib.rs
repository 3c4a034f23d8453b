//! # Wayfare
//!
//! A travel planning and weather server, usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! wayfare = "0.1"
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wayfare::server::{AppState, create_router};
//! use wayfare::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/wayfare.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), None));
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
pub mod weather;
