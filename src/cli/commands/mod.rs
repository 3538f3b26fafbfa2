pub mod auth;
pub mod author;
pub mod book;
pub mod health;
pub mod import;
pub mod library;
