use rand::{thread_rng, Rng};

pub type HashError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One-way salted password hashing.
/// Injected rather than called ambiently so the reset flow stays decoupled
/// from the algorithm.
pub trait Hasher {
  fn hash(&self, password: &str) -> Result<String, HashError>;
  fn verify(&self, password: &str, password_hash: &str) -> Result<bool, HashError>;
}

#[derive(Clone, Copy, Debug)]
pub struct Argon2Hasher;

impl Hasher for Argon2Hasher {
  fn hash(&self, password: &str) -> Result<String, HashError> {
    let hash = argon2::hash_encoded(
      // password
      password.as_bytes(),
      // salt
      &thread_rng().gen::<[u8; 32]>(),
      // config
      &argon2::Config::default(),
    )?;
    Ok(hash)
  }

  fn verify(&self, password: &str, password_hash: &str) -> Result<bool, HashError> {
    Ok(argon2::verify_encoded(password_hash, password.as_bytes())?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_verifies_and_rejects() {
    let hash = Argon2Hasher.hash("abc123").unwrap();
    assert!(Argon2Hasher.verify("abc123", &hash).unwrap());
    assert!(!Argon2Hasher.verify("abc124", &hash).unwrap());
  }

  #[test]
  fn hash_is_salted_and_never_plaintext() {
    let first = Argon2Hasher.hash("abc123").unwrap();
    let second = Argon2Hasher.hash("abc123").unwrap();
    assert_ne!(first, "abc123");
    // random salt: same password, different encodings
    assert_ne!(first, second);
  }
}
