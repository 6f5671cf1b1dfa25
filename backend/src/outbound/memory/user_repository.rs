//! `UserRepository` held in process memory.
//!
//! Records live for the lifetime of the process. Uniqueness of name and email
//! is checked and the record inserted under a single lock, so concurrent
//! sign-ups for the same name cannot both succeed.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UniqueField, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserName};

/// Thread-safe in-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory user store lock poisoned"))
    }

    fn find(&self, matches: impl Fn(&User) -> bool) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.iter().find(|user| matches(user)).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        self.find(|user| user.email() == email)
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        self.find(|user| user.name() == name)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.find(|user| user.id() == id)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if users.iter().any(|user| user.name() == &new_user.name) {
            debug!(name = %new_user.name, "rejecting duplicate user name");
            return Err(UserPersistenceError::duplicate(UniqueField::Name));
        }
        if users.iter().any(|user| user.email() == &new_user.email) {
            debug!("rejecting duplicate user email");
            return Err(UserPersistenceError::duplicate(UniqueField::Email));
        }
        let user = User::new(
            UserId::random(),
            new_user.name.clone(),
            new_user.email.clone(),
            new_user.password_hash.clone(),
        );
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::PasswordHash;
    use rstest::{fixture, rstest};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: UserName::new(name).expect("valid name"),
            email: EmailAddress::new(email).expect("valid email"),
            password_hash: PasswordHash::new("$2b$04$hash"),
        }
    }

    #[fixture]
    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn created_user_is_found_by_every_key(repository: InMemoryUserRepository) {
        let created = repository
            .create(&new_user("alice", "a@b.com"))
            .await
            .expect("create succeeds");

        let by_id = repository.find_by_id(created.id()).await.expect("lookup");
        let by_name = repository.find_by_name(created.name()).await.expect("lookup");
        let by_email = repository.find_by_email(created.email()).await.expect("lookup");

        assert_eq!(by_id.as_ref(), Some(&created));
        assert_eq!(by_name.as_ref(), Some(&created));
        assert_eq!(by_email.as_ref(), Some(&created));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_keys_resolve_to_none(repository: InMemoryUserRepository) {
        let missing = repository
            .find_by_id(&UserId::random())
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[rstest]
    #[case("alice", "other@b.com", UniqueField::Name)]
    #[case("bob", "a@b.com", UniqueField::Email)]
    #[tokio::test]
    async fn duplicates_are_rejected(
        repository: InMemoryUserRepository,
        #[case] name: &str,
        #[case] email: &str,
        #[case] field: UniqueField,
    ) {
        repository
            .create(&new_user("alice", "a@b.com"))
            .await
            .expect("first create succeeds");

        let err = repository
            .create(&new_user(name, email))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err, UserPersistenceError::duplicate(field));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_for_one_name_admit_a_single_winner() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let attempts = (0..8).map(|i| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .create(&new_user("alice", &format!("a{i}@b.com")))
                    .await
            })
        });

        let mut successes = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.expect("task joins").is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
