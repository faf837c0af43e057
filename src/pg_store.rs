use async_trait::async_trait;
use tokio_postgres::GenericClient;

use super::db_types::{ResetCodePassword, User};
use super::password_reset_flow::{CredentialStore, ResetCodeStore, StoreError};
use super::reset_code_service;
use super::user_service;
use super::utils;

/// Postgres-backed stores for the reset flow. Presented codes are hashed
/// before lookup, matching how they are stored at rest.
pub struct PgStore<'a, C: GenericClient>(pub &'a mut C);

#[async_trait]
impl<'a, C: GenericClient + Send + Sync> ResetCodeStore for PgStore<'a, C> {
  async fn remove_reset_code(
    &mut self,
    code: &str,
  ) -> Result<Option<ResetCodePassword>, StoreError> {
    let removed = reset_code_service::remove_by_code_hash(self.0, &utils::hash_str(code)).await?;
    Ok(removed)
  }
}

#[async_trait]
impl<'a, C: GenericClient + Send + Sync> CredentialStore for PgStore<'a, C> {
  async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
    let user = user_service::get_by_email(self.0, email).await?;
    Ok(user)
  }

  async fn update_password_hash(
    &mut self,
    user_id: i64,
    password_hash: &str,
  ) -> Result<(), StoreError> {
    user_service::update_password_hash(self.0, user_id, password_hash).await?;
    Ok(())
  }
}
