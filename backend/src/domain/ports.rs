//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the user store and the password hashing backend). Each trait exposes a
//! strongly typed error so adapters map their failures into predictable
//! variants.

mod macros;
mod password_hasher;
mod user_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UniqueField, UserPersistenceError, UserRepository};
