pub mod argon2;
pub mod errors;
pub mod truncate;

pub use argon2::PasswordHasher;
pub use argon2::PasswordParams;
pub use errors::PasswordError;
pub use truncate::truncate_to_limit;
pub use truncate::MAX_PASSWORD_BYTES;
