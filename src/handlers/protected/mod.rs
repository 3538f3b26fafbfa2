// handlers/protected/mod.rs - Protected handlers (authenticated caller required)
//
// Every handler here takes the `Authenticated` extractor first, so anonymous
// requests are rejected with 401 before the path or body is looked at.
pub mod auth;
pub mod authors;
pub mod books;
pub mod libraries;
