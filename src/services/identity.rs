use async_trait::async_trait;

use crate::{Error, IdentityProvider, Result, User};

pub const NOT_CONFIGURED: &str = "identity provider is not configured";

/// Identity provider used when none is wired in. Every sign-in is rejected;
/// signing out always succeeds so a stale persisted session can be cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineIdentity;

#[async_trait]
impl IdentityProvider for OfflineIdentity {
    async fn register(&self, _email: &str, _password: &str) -> Result<User> {
        Err(Error::Identity(NOT_CONFIGURED.to_string()))
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<User> {
        Err(Error::Identity(NOT_CONFIGURED.to_string()))
    }

    async fn federated_login(&self) -> Result<User> {
        Err(Error::Identity(NOT_CONFIGURED.to_string()))
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}
