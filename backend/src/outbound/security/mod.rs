//! Security adapters: password hashing and bearer credentials.

mod argon2_password_hasher;
mod jwt_tokens;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_tokens::JwtTokenService;
