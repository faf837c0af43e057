use async_trait::async_trait;

use super::clock::Clock;
use super::db_types::{ResetCodePassword, User};
use super::hasher::{HashError, Hasher};

pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Store of outstanding one-time reset codes.
#[async_trait]
pub trait ResetCodeStore {
  /// Claims and removes the record for `code` in a single step: of any
  /// number of concurrent callers presenting the same code, at most one
  /// receives `Some`.
  async fn remove_reset_code(
    &mut self,
    code: &str,
  ) -> Result<Option<ResetCodePassword>, StoreError>;
}

/// Store of account credentials.
#[async_trait]
pub trait CredentialStore {
  async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError>;

  async fn update_password_hash(
    &mut self,
    user_id: i64,
    password_hash: &str,
  ) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum ResetFailure {
  /// no live code matches; also what the loser of a double-spend race sees
  CodeNotFound,
  /// the code outlived its window; its removal must still be committed
  CodeExpired,
  /// the code references an account that no longer exists
  CredentialMissing,
  Store(StoreError),
  Hash(HashError),
}

/// Verifies a presented reset code and, if it is live and unexpired, replaces
/// the associated account's password hash exactly once, consuming the code.
///
/// The caller owns atomicity: all store operations must happen inside one
/// transaction, committed on `Ok` and on `CodeExpired` (the code is removed
/// on both paths) and rolled back on every other failure.
pub async fn reset_password<S, C, H>(
  store: &mut S,
  clock: &C,
  hasher: &H,
  code: &str,
  new_password: &str,
) -> Result<(), ResetFailure>
where
  S: ResetCodeStore + CredentialStore + Send,
  C: Clock + Sync,
  H: Hasher + Sync,
{
  // claim the code; a second spend of the same code stops here
  let reset_code = store
    .remove_reset_code(code)
    .await
    .map_err(ResetFailure::Store)?
    .ok_or(ResetFailure::CodeNotFound)?;

  if reset_code.is_expired(clock.current_time_millis()) {
    return Err(ResetFailure::CodeExpired);
  }

  let user = store
    .find_by_email(&reset_code.email)
    .await
    .map_err(ResetFailure::Store)?
    .ok_or(ResetFailure::CredentialMissing)?;

  let password_hash = hasher.hash(new_password).map_err(ResetFailure::Hash)?;

  store
    .update_password_hash(user.user_id, &password_hash)
    .await
    .map_err(ResetFailure::Store)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::FixedClock;
  use crate::db_types::ONE_HOUR;
  use crate::hasher::Argon2Hasher;
  use std::collections::HashMap;
  use std::sync::{Arc, Mutex};

  static NOW: i64 = 1_700_000_000_000;

  #[derive(Default)]
  struct MemState {
    codes: HashMap<String, ResetCodePassword>,
    users: HashMap<i64, User>,
  }

  #[derive(Clone, Default)]
  struct MemStore(Arc<Mutex<MemState>>);

  impl MemStore {
    fn insert_code(&self, code: &str, email: &str, creation_time: i64) {
      self.0.lock().unwrap().codes.insert(
        code.to_owned(),
        ResetCodePassword {
          code_hash: code.to_owned(),
          email: email.to_owned(),
          creation_time,
        },
      );
    }

    fn insert_user(&self, user_id: i64, email: &str, password_hash: &str) {
      self.0.lock().unwrap().users.insert(
        user_id,
        User {
          user_id,
          creation_time: NOW - 10 * ONE_HOUR,
          email: email.to_owned(),
          password_hash: password_hash.to_owned(),
        },
      );
    }

    fn has_code(&self, code: &str) -> bool {
      self.0.lock().unwrap().codes.contains_key(code)
    }

    fn password_hash_of(&self, user_id: i64) -> String {
      self.0.lock().unwrap().users[&user_id].password_hash.clone()
    }
  }

  #[async_trait]
  impl ResetCodeStore for MemStore {
    async fn remove_reset_code(
      &mut self,
      code: &str,
    ) -> Result<Option<ResetCodePassword>, StoreError> {
      Ok(self.0.lock().unwrap().codes.remove(code))
    }
  }

  #[async_trait]
  impl CredentialStore for MemStore {
    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
      Ok(
        self
          .0
          .lock()
          .unwrap()
          .users
          .values()
          .find(|u| u.email == email)
          .cloned(),
      )
    }

    async fn update_password_hash(
      &mut self,
      user_id: i64,
      password_hash: &str,
    ) -> Result<(), StoreError> {
      let mut state = self.0.lock().unwrap();
      let user = state.users.get_mut(&user_id).ok_or("no such user")?;
      user.password_hash = password_hash.to_owned();
      Ok(())
    }
  }

  #[tokio::test]
  async fn valid_code_updates_hash_and_consumes_code() {
    let mut store = MemStore::default();
    let old_hash = Argon2Hasher.hash("oldpassword1").unwrap();
    store.insert_user(1, "shopper@example.com", &old_hash);
    store.insert_code("c1", "shopper@example.com", NOW - 30 * 60 * 1000);

    reset_password(&mut store, &FixedClock(NOW), &Argon2Hasher, "c1", "abc123")
      .await
      .unwrap();

    let new_hash = store.password_hash_of(1);
    assert_ne!(new_hash, old_hash);
    assert_ne!(new_hash, "abc123");
    assert!(Argon2Hasher.verify("abc123", &new_hash).unwrap());
    assert!(!store.has_code("c1"));

    // single use: spending the same code again fails
    let second = reset_password(&mut store, &FixedClock(NOW), &Argon2Hasher, "c1", "def456").await;
    assert!(matches!(second, Err(ResetFailure::CodeNotFound)));
    assert_eq!(store.password_hash_of(1), new_hash);
  }

  #[tokio::test]
  async fn exactly_one_hour_old_code_is_honored() {
    let mut store = MemStore::default();
    store.insert_user(1, "shopper@example.com", "old");
    store.insert_code("c1", "shopper@example.com", NOW - ONE_HOUR);

    reset_password(&mut store, &FixedClock(NOW), &Argon2Hasher, "c1", "abc123")
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn expired_code_is_removed_without_touching_credential() {
    let mut store = MemStore::default();
    store.insert_user(1, "shopper@example.com", "old");
    store.insert_code("c1", "shopper@example.com", NOW - 2 * ONE_HOUR);

    let result =
      reset_password(&mut store, &FixedClock(NOW), &Argon2Hasher, "c1", "abc123").await;

    assert!(matches!(result, Err(ResetFailure::CodeExpired)));
    assert!(!store.has_code("c1"));
    assert_eq!(store.password_hash_of(1), "old");
  }

  #[tokio::test]
  async fn orphaned_code_never_succeeds() {
    let mut store = MemStore::default();
    store.insert_code("c1", "gone@example.com", NOW - 60 * 1000);

    let result =
      reset_password(&mut store, &FixedClock(NOW), &Argon2Hasher, "c1", "abc123").await;

    assert!(matches!(result, Err(ResetFailure::CredentialMissing)));
  }

  #[tokio::test]
  async fn concurrent_spends_of_one_code_yield_one_winner() {
    let store = MemStore::default();
    store.insert_user(1, "shopper@example.com", "old");
    store.insert_code("c1", "shopper@example.com", NOW - 60 * 1000);

    let mut first = store.clone();
    let mut second = store.clone();
    let clock = FixedClock(NOW);
    let hasher = Argon2Hasher;
    let (a, b) = tokio::join!(
      reset_password(&mut first, &clock, &hasher, "c1", "abc123"),
      reset_password(&mut second, &clock, &hasher, "c1", "xyz789"),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(ResetFailure::CodeNotFound)));
  }
}
