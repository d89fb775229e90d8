pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod docs;
pub mod model;
pub mod routes;
pub mod telemetry;
pub mod utils;

pub use config::Config;
pub use routes::AppState;
