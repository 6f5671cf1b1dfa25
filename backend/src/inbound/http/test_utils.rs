//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};
use mockable::DefaultClock;

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{AccessGate, CredentialService, EmailAddress, NewUser, User, UserName};
use crate::outbound::crypto::BcryptPasswordHasher;
use crate::outbound::memory::InMemoryUserRepository;

use super::session::SessionManager;
use super::session_config::SessionSettings;
use super::state::HttpState;

/// Fixed secret so cookies issued by one helper call verify in another.
const TEST_SECRET: [u8; 64] = [42; 64];

/// Session manager with a fixed key and `Secure` disabled for plain HTTP.
pub fn test_sessions() -> SessionManager {
    let settings = SessionSettings::from_secret(&TEST_SECRET, false, SameSite::Lax)
        .expect("test secret is long enough");
    SessionManager::new(settings, Arc::new(DefaultClock))
}

/// Cheapest bcrypt cost, keeping hashing tests fast.
pub fn test_hasher() -> Arc<BcryptPasswordHasher> {
    Arc::new(BcryptPasswordHasher::new(4).expect("cost 4 is valid"))
}

/// State over `users` with a fast hasher.
pub fn state_with(users: Arc<dyn UserRepository>) -> HttpState {
    let credentials = CredentialService::new(users.clone(), test_hasher());
    HttpState::new(credentials, AccessGate::new(users), test_sessions())
}

/// Insert a user with a real bcrypt hash of `password`.
pub async fn seed_user(repository: &InMemoryUserRepository, name: &str, password: &str) -> User {
    let hash = test_hasher().hash(password).await.expect("hash");
    repository
        .create(&NewUser {
            name: UserName::new(name).expect("name"),
            email: EmailAddress::new(format!("{name}@example.com")).expect("email"),
            password_hash: hash,
        })
        .await
        .expect("seed user")
}

/// Session cookie for `user`.
pub fn session_cookie(user: &User) -> Cookie<'static> {
    test_sessions().create_session(user.id()).expect("cookie")
}
