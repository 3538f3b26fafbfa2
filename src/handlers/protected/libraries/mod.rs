mod create;
mod holdings;
mod librarian;

pub use create::create;
pub use holdings::add_book;
pub use librarian::assign;
