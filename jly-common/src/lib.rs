//! # jly-common
//!
//! Shared code for the Jiuliyue site workspace:
//! - Site configuration document (schema, loaders, editor model)
//! - Feature toggle table
//! - Wallpaper gallery URL resolution
//! - Server settings (TOML / environment / compiled defaults)
//! - Common error type

pub mod config;
pub mod error;
pub mod site;

pub use error::{Error, Result};
pub use site::{Icon, LinkEntry, SiteConfiguration};
