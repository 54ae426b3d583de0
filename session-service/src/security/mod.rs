/// Password hashing and verification
pub mod password;

pub use password::{hash_password, Argon2PasswordVerifier, PasswordVerifier};
