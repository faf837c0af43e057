use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetNewProps {
  pub user_email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetConfirmProps {
  pub code: String,
  pub password: String,
  pub password_confirmation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscountTypeNewProps {
  pub name: String,
  pub parent_discount_type_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscountTypeViewProps {
  pub discount_type_id: Option<Vec<i64>>,
  pub min_creation_time: Option<i64>,
  pub max_creation_time: Option<i64>,
  pub parent_discount_type_id: Option<Vec<i64>>,
  pub name: Option<Vec<String>>,
  #[serde(default)]
  pub root_only: bool,
}
