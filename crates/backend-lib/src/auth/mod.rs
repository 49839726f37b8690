// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;

pub use password::{hash_password, hash_password_secure, verify_password};
pub use token::{Claims, TokenSigner, TOKEN_TTL_SECS};
