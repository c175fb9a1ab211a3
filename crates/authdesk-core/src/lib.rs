//! Core authdesk library (validation, API client, session store, routing, views).

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod router;
pub mod session;
pub mod validate;
pub mod views;

pub use context::Context;
pub use error::{ClientError, ClientResult, ErrorKind};
