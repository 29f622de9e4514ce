//! HTTP API handlers for jly-web
//!
//! JSON, plain-text and SSE endpoints. HTML pages live in `crate::pages`.

pub mod catalog;
pub mod health;
pub mod player;
pub mod seo;
pub mod site_config;

pub use catalog::catalog_routes;
pub use health::health_routes;
pub use player::player_routes;
pub use seo::seo_routes;
pub use site_config::site_config_routes;
