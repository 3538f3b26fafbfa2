// handlers/elevated/mod.rs - Staff handlers
//
// Anonymous callers get 401, authenticated non-staff callers 403.
pub mod books;
