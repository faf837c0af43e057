// reset codes are honorable for one hour after issuance
pub static ONE_HOUR: i64 = 60 * 60 * 1000;

#[derive(Clone, Debug)]
pub struct User {
  pub user_id: i64,
  pub creation_time: i64,
  pub email: String,
  pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct ResetCodePassword {
  pub code_hash: String,
  pub email: String,
  pub creation_time: i64,
}

impl ResetCodePassword {
  /// True once more than one hour has passed since issuance.
  /// A code whose age is exactly one hour is still honored.
  pub fn is_expired(&self, now: i64) -> bool {
    self.creation_time + ONE_HOUR < now
  }
}

#[derive(Clone, Debug)]
pub struct DiscountType {
  pub discount_type_id: i64,
  pub creation_time: i64,
  pub name: String,
  pub parent_discount_type_id: Option<i64>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn code_created_at(creation_time: i64) -> ResetCodePassword {
    ResetCodePassword {
      code_hash: "hash".to_owned(),
      email: "shopper@example.com".to_owned(),
      creation_time,
    }
  }

  #[test]
  fn fresh_code_is_not_expired() {
    let code = code_created_at(1_000_000);
    assert!(!code.is_expired(1_000_000 + 30 * 60 * 1000));
  }

  #[test]
  fn exactly_one_hour_old_code_is_still_valid() {
    let code = code_created_at(1_000_000);
    assert!(!code.is_expired(1_000_000 + ONE_HOUR));
  }

  #[test]
  fn code_older_than_one_hour_is_expired() {
    let code = code_created_at(1_000_000);
    assert!(code.is_expired(1_000_000 + ONE_HOUR + 1));
    assert!(code.is_expired(1_000_000 + 2 * ONE_HOUR));
  }
}
