// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalog reads, token acquisition and service status. A bearer token is
// still validated when one is sent.
pub mod auth;
pub mod authors;
pub mod books;
pub mod libraries;

mod health;
mod root;

pub use health::health;
pub use root::root;
