/// Password hashing and signed tokens
pub mod password;
pub mod tokens;

pub use tokens::{IssuedToken, TokenIssuer, TokenPurpose};
