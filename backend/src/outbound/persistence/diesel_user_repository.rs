//! PostgreSQL-backed `UserRepository`.
//!
//! Uniqueness of `name` and `email` is enforced by the table's constraints,
//! so the insert itself is the race-free availability check. A unique
//! violation is reported as [`UserPersistenceError::Duplicate`] naming the
//! column whose constraint fired.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UniqueField, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, PasswordHash, User, UserId, UserName};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const NAME_CONSTRAINT: &str = "users_name_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.message())
}

fn unique_field(info: &dyn DatabaseErrorInformation) -> Option<UniqueField> {
    match info.constraint_name()? {
        NAME_CONSTRAINT => Some(UniqueField::Name),
        EMAIL_CONSTRAINT => Some(UniqueField::Email),
        _ => None,
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match unique_field(info.as_ref()) {
                Some(field) => UserPersistenceError::duplicate(field),
                None => UserPersistenceError::query("unexpected unique violation"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let corrupt = |field: &str| {
        warn!(user_id = %row.id, field, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user has invalid {field}"))
    };
    let name = UserName::new(&row.name).map_err(|_| corrupt("name"))?;
    let email = EmailAddress::new(&row.email).map_err(|_| corrupt("email"))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        PasswordHash::new(row.password_hash),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        let email: &str = email.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        let name: &str = name.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::name.eq(name))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            name: new_user.name.as_ref(),
            email: new_user.email.as_ref(),
            password_hash: new_user.password_hash.as_str(),
        };
        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(inserted)
    }
}
