//! Client side of HRMS Lite: the HTTP store binding, the per-page controllers
//! and the console shell that hosts them.

pub mod config;
pub mod controller;
pub mod error;
pub mod in_flight;
pub mod prompt;
pub mod roster;
pub mod shell;
pub mod store;

pub use config::ClientConfig;
pub use error::ClientError;
pub use store::{HttpStore, RemoteStore};
