//! Command implementations for sourdough-cli

pub mod records;
pub mod sitemap;

pub use records::{create, delete, get, health, list, update};
pub use sitemap::sitemap;
