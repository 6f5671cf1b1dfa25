//! Access gate resolving the current user for protected views.

use std::sync::Arc;

use tracing::debug;

use super::ports::UserRepository;
use super::{Error, User, UserId};

/// Resolves a session's user id to a live user record.
#[derive(Clone)]
pub struct AccessGate {
    users: Arc<dyn UserRepository>,
}

impl AccessGate {
    /// Create a gate over the user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Return the user for `session_user`, or `None` when there is no session
    /// or the id no longer resolves to a record.
    ///
    /// # Errors
    /// Repository failures propagate; they are not treated as "anonymous".
    pub async fn resolve_current_user(
        &self,
        session_user: Option<&UserId>,
    ) -> Result<Option<User>, Error> {
        let Some(user_id) = session_user else {
            return Ok(None);
        };
        let user = self.users.find_by_id(user_id).await?;
        if user.is_none() {
            debug!(user_id = %user_id, "session refers to a missing user");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::domain::{EmailAddress, ErrorCode, PasswordHash, UserName};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn user(id: &UserId) -> User {
        User::new(
            id.clone(),
            UserName::new("alice").expect("name"),
            EmailAddress::new("a@b.com").expect("email"),
            PasswordHash::new("hash"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn no_session_is_anonymous_without_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let gate = AccessGate::new(Arc::new(users));

        let resolved = gate.resolve_current_user(None).await.expect("resolves");
        assert!(resolved.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn existing_user_is_returned() {
        let id = UserId::random();
        let stored = user(&id);
        let returned = stored.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(id.clone()))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        let gate = AccessGate::new(Arc::new(users));

        let resolved = gate.resolve_current_user(Some(&id)).await.expect("resolves");
        assert_eq!(resolved, Some(stored));
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_user_resolves_to_none() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let gate = AccessGate::new(Arc::new(users));

        let resolved = gate
            .resolve_current_user(Some(&UserId::random()))
            .await
            .expect("resolves");
        assert!(resolved.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failure_propagates() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Err(UserPersistenceError::connection("down")));
        let gate = AccessGate::new(Arc::new(users));

        let error = gate
            .resolve_current_user(Some(&UserId::random()))
            .await
            .expect_err("failure propagates");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
