use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid number for '{field}': {value}")]
    InvalidNumber { field: String, value: String },
}
