mod delete;

pub use delete::delete;
