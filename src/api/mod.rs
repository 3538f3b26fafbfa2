// Request payload parsing and field validation for the JSON API.
pub mod account;
pub mod author;
pub mod book;
pub mod fields;
pub mod library;

pub use account::{Credentials, TokenResponse};
pub use author::AuthorPayload;
pub use book::{current_year, BookPayload};
pub use library::{HoldingPayload, LibrarianPayload, LibraryPayload};
