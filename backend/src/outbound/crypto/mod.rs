//! Password hashing adapters.

mod bcrypt_hasher;

pub use bcrypt_hasher::{BcryptPasswordHasher, DEFAULT_COST, MAX_COST, MIN_COST};
