//! bcrypt-backed `PasswordHasher`.
//!
//! Every hash and verification runs on Tokio's blocking pool, with the
//! caller's tracing span and trace id re-entered on the worker thread.

use async_trait::async_trait;
use tracing::Span;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, TraceId};

/// Work factor used unless configured otherwise.
pub const DEFAULT_COST: u32 = 10;
/// Cheapest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Most expensive work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// [`PasswordHasher`] using bcrypt with a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given cost (4 to 31 inclusive).
    ///
    /// # Examples
    /// ```
    /// use authgate::outbound::crypto::BcryptPasswordHasher;
    ///
    /// assert!(BcryptPasswordHasher::new(10).is_ok());
    /// assert!(BcryptPasswordHasher::new(3).is_err());
    /// ```
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordHashError::hash(format!(
                "bcrypt cost {cost} outside {}..={}",
                MIN_COST,
                MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();
    let task = TraceId::in_blocking(move || span.in_scope(job));
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(|error| error.to_string()),
        Err(join_error) => Err(format!("hashing worker failed: {join_error}")),
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let encoded = run_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(PasswordHashError::hash)?;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || bcrypt::verify(password.as_bytes(), &encoded))
            .await
            .map_err(PasswordHashError::verify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(MIN_COST).expect("minimum cost is valid")
    }

    #[rstest]
    #[tokio::test]
    async fn hash_then_verify_accepts_same_password(hasher: BcryptPasswordHasher) {
        let hash = hasher.hash("secret1").await.expect("hash succeeds");

        assert!(hasher.verify("secret1", &hash).await.expect("verify runs"));
        assert!(!hasher.verify("secret2", &hash).await.expect("verify runs"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_embed_cost_and_fresh_salt(hasher: BcryptPasswordHasher) {
        let first = hasher.hash("secret1").await.expect("hash succeeds");
        let second = hasher.hash("secret1").await.expect("hash succeeds");

        assert!(first.as_str().starts_with("$2b$04$"));
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_a_verify_error(hasher: BcryptPasswordHasher) {
        let err = hasher
            .verify("secret1", &PasswordHash::new("not-a-bcrypt-hash"))
            .await
            .expect_err("malformed hash must fail");
        assert!(matches!(err, PasswordHashError::Verify { .. }));
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn out_of_range_cost_is_rejected(#[case] cost: u32) {
        assert!(BcryptPasswordHasher::new(cost).is_err());
    }

    #[rstest]
    #[case(MIN_COST)]
    #[case(MAX_COST)]
    fn boundary_costs_are_accepted(#[case] cost: u32) {
        let hasher = BcryptPasswordHasher::new(cost).expect("boundary cost is valid");
        assert_eq!(hasher.cost(), cost);
    }

    #[rstest]
    fn default_cost_is_ten() {
        assert_eq!(BcryptPasswordHasher::default().cost(), DEFAULT_COST);
    }
}
