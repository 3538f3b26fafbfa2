mod create;
mod update;

pub use create::create;
pub use update::{patch, replace};
