pub mod access;
pub mod auth;
pub mod response;

pub use access::{AccessRule, Authenticated, Staff};
pub use auth::{authenticate_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
