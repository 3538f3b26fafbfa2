pub mod author;
pub mod book;
pub mod library;
pub mod user;

pub use author::{Author, AuthorDetail};
pub use book::{Book, NewBook};
pub use library::{Librarian, Library, LibraryDetail};
pub use user::{NewUser, User, UserView};
