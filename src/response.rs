use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
  pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordReset {
  pub creation_time: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscountType {
  pub discount_type_id: i64,
  pub creation_time: i64,
  pub name: String,
  pub parent_discount_type_id: Option<i64>,
}

// errors a handler can produce; the api layer turns these into status codes
// and {message} bodies
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
  PasswordResetNonexistent,
  PasswordResetExpired,
  PasswordTooShort,
  PasswordConfirmationMismatch,
  EmailNonexistent,
  DiscountTypeNonexistent,
  DiscountTypeNameEmpty,
  EmailBounced,
  EmailUnknown,
  DecodeError,
  MethodNotAllowed,
  NotFound,
  InternalServerError,
  Unknown,
}

impl ApiError {
  pub fn message(&self) -> &'static str {
    match self {
      ApiError::PasswordResetNonexistent => "reset code is invalid",
      ApiError::PasswordResetExpired => "code is expired",
      ApiError::PasswordTooShort => "password must be at least 6 characters",
      ApiError::PasswordConfirmationMismatch => "password confirmation does not match",
      ApiError::EmailNonexistent => "no account with this email",
      ApiError::DiscountTypeNonexistent => "discount type does not exist",
      ApiError::DiscountTypeNameEmpty => "discount type name is empty",
      ApiError::EmailBounced => "could not deliver mail to this address",
      ApiError::EmailUnknown => "failed to send mail",
      ApiError::DecodeError => "could not decode request body",
      ApiError::MethodNotAllowed => "method not allowed",
      ApiError::NotFound => "not found",
      ApiError::InternalServerError => "internal server error",
      ApiError::Unknown => "unknown error",
    }
  }
}
