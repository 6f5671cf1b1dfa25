//! Credential service: password verification on sign-in, hashing and user
//! creation on sign-up.
//!
//! Sign-in never distinguishes "no such email" from "wrong password": both
//! yield `Ok(None)`, and an unknown email still pays for one hash
//! verification against a decoy so the two cases take comparable time.
//! Sign-up translates uniqueness collisions into field errors; only
//! repository or hashing failures escape as [`Error`].

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::ports::{PasswordHasher, UniqueField, UserPersistenceError, UserRepository};
use super::{
    EmailAddress, Error, Field, FieldErrors, NewUser, PasswordHash, SigninCredentials,
    SignupCredentials, User, UserName,
};

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Message shown when the name is already registered.
pub fn name_taken_message(name: &UserName) -> String {
    format!("User {name} already used! Please choose another one.")
}

/// Message shown when the email is already registered.
pub fn email_taken_message(email: &EmailAddress) -> String {
    format!("Email {email} already registered!")
}

/// Sign-up failures.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// The name and/or email are taken; carries the per-field messages.
    #[error("sign-up conflicts with an existing user")]
    Conflict(FieldErrors),
    /// Repository or hashing failure.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Verifies and registers credentials against the user repository.
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    decoy: OnceCell<PasswordHash>,
}

impl CredentialService {
    /// Create a service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            decoy: OnceCell::new(),
        }
    }

    /// Return the user when the email exists and the password matches.
    ///
    /// # Errors
    /// Repository and hashing failures propagate as [`Error`].
    pub async fn signin(&self, credentials: &SigninCredentials) -> Result<Option<User>, Error> {
        let password = credentials.password.expose();
        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            let decoy = self.decoy_hash().await?;
            self.hasher.verify(password, decoy).await?;
            debug!("sign-in rejected");
            return Ok(None);
        };

        if self.hasher.verify(password, user.password_hash()).await? {
            info!(user_id = %user.id(), "user signed in");
            Ok(Some(user))
        } else {
            debug!("sign-in rejected");
            Ok(None)
        }
    }

    /// Report which of `name` and `email` are already registered.
    ///
    /// # Errors
    /// [`SignupError::Conflict`] lists every taken field;
    /// [`SignupError::Internal`] wraps repository failures.
    pub async fn check_availability(
        &self,
        name: &UserName,
        email: &EmailAddress,
    ) -> Result<(), SignupError> {
        let mut conflicts = FieldErrors::default();
        if self.users.find_by_name(name).await.map_err(Error::from)?.is_some() {
            conflicts.insert(Field::Name, name_taken_message(name));
        }
        if self.users.find_by_email(email).await.map_err(Error::from)?.is_some() {
            conflicts.insert(Field::Email, email_taken_message(email));
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(SignupError::Conflict(conflicts))
        }
    }

    /// Hash the password and persist a new user.
    ///
    /// A uniqueness violation raised by the repository (for example a
    /// concurrent sign-up that slipped past [`Self::check_availability`]) is
    /// reported as [`SignupError::Conflict`].
    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<User, SignupError> {
        let password_hash = self
            .hasher
            .hash(credentials.password.expose())
            .await
            .map_err(Error::from)?;
        let new_user = NewUser {
            name: credentials.name.clone(),
            email: credentials.email.clone(),
            password_hash,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), "user signed up");
                Ok(user)
            }
            Err(UserPersistenceError::Duplicate { field }) => {
                Err(SignupError::Conflict(conflict_for(field, credentials)))
            }
            Err(error) => Err(SignupError::Internal(error.into())),
        }
    }

    /// Availability check followed by [`Self::signup`].
    pub async fn register(&self, credentials: &SignupCredentials) -> Result<User, SignupError> {
        self.check_availability(&credentials.name, &credentials.email)
            .await?;
        self.signup(credentials).await
    }

    async fn decoy_hash(&self) -> Result<&PasswordHash, Error> {
        let hash = self
            .decoy
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await?;
        Ok(hash)
    }
}

fn conflict_for(field: UniqueField, credentials: &SignupCredentials) -> FieldErrors {
    let mut errors = FieldErrors::default();
    match field {
        UniqueField::Name => errors.insert(Field::Name, name_taken_message(&credentials.name)),
        UniqueField::Email => errors.insert(Field::Email, email_taken_message(&credentials.email)),
    }
    errors
}
