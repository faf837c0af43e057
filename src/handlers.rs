use std::error::Error;

use super::Config;
use super::Db;

use super::clock::SystemClock;
use super::db_types::*;
use super::discount_type_service;
use super::hasher::Argon2Hasher;
use super::mail_service::{MailError, MailNewProps, MailService};
use super::password_reset_flow::{self, ResetFailure};
use super::pg_store::PgStore;
use super::request;
use super::reset_code_service;
use super::response;
use super::response::ApiError;
use super::user_service;
use super::utils;

static MIN_PASSWORD_LENGTH: usize = 6;

fn report_internal_err<E: std::error::Error>(e: E) -> ApiError {
  utils::log(utils::Event {
    msg: e.to_string(),
    source: e.source().map(|e| e.to_string()),
    severity: utils::SeverityKind::Error,
  });
  ApiError::Unknown
}

fn report_postgres_err(e: tokio_postgres::Error) -> ApiError {
  utils::log(utils::Event {
    msg: e.to_string(),
    source: e.source().map(|e| e.to_string()),
    severity: utils::SeverityKind::Error,
  });
  ApiError::InternalServerError
}

fn report_store_err(e: password_reset_flow::StoreError) -> ApiError {
  utils::log(utils::Event {
    msg: e.to_string(),
    source: e.source().map(|e| e.to_string()),
    severity: utils::SeverityKind::Error,
  });
  ApiError::InternalServerError
}

fn report_mail_err(e: MailError) -> ApiError {
  let ae = match e {
    MailError::DestinationBounced => ApiError::EmailBounced,
    MailError::DestinationProhibited => ApiError::EmailBounced,
    _ => ApiError::EmailUnknown,
  };

  utils::log(utils::Event {
    msg: format!("{:?}", ae),
    source: Some(format!("email service: {}", e.as_str())),
    severity: utils::SeverityKind::Error,
  });

  ae
}

fn fill_password_reset(password_reset: ResetCodePassword) -> response::PasswordReset {
  response::PasswordReset {
    creation_time: password_reset.creation_time,
  }
}

fn fill_discount_type(discount_type: DiscountType) -> response::DiscountType {
  response::DiscountType {
    discount_type_id: discount_type.discount_type_id,
    creation_time: discount_type.creation_time,
    name: discount_type.name,
    parent_discount_type_id: discount_type.parent_discount_type_id,
  }
}

// caller-facing validation of the new password, before the flow runs
fn validate_new_password(password: &str, password_confirmation: &str) -> Result<(), ApiError> {
  if password.len() < MIN_PASSWORD_LENGTH {
    return Err(ApiError::PasswordTooShort);
  }
  if password != password_confirmation {
    return Err(ApiError::PasswordConfirmationMismatch);
  }
  Ok(())
}

pub async fn send_password_reset_email(
  mail_service: &MailService,
  target_email: &str,
  site_external_url: &str,
  reset_code: &str,
) -> Result<(), ApiError> {
  let _ = mail_service
    .mail_new(MailNewProps {
      request_id: 0,
      destination: target_email.to_owned(),
      topic: "password_reset".to_owned(),
      title: format!("{}: Password Reset", site_external_url),
      content: [
        "<p>Requested password reset service: </p>",
        "<p>If you did not make this request, then feel free to ignore.</p>",
        "<p>This code is valid for up to one hour.</p>",
        "<p>Do not share this code with others.</p>",
        &format!(
          "<p>Password change link: {}/reset_password?resetCode={}</p>",
          site_external_url, reset_code
        ),
      ]
      .join(""),
    })
    .await
    .map_err(report_mail_err)?;

  Ok(())
}

pub async fn password_reset_new(
  config: Config,
  db: Db,
  mail_service: MailService,
  props: request::PasswordResetNewProps,
) -> Result<response::PasswordReset, ApiError> {
  let con = &mut *db.lock().await;

  let user = user_service::get_by_email(con, &props.user_email)
    .await
    .map_err(report_postgres_err)?
    .ok_or(ApiError::EmailNonexistent)?;

  let raw_code = utils::gen_random_string();

  // send mail
  send_password_reset_email(
    &mail_service,
    &user.email,
    &config.site_external_url,
    &raw_code,
  )
  .await?;

  let mut sp = con.transaction().await.map_err(report_postgres_err)?;

  // a fresh code supersedes any outstanding one for this address
  reset_code_service::remove_by_email(&mut sp, &user.email)
    .await
    .map_err(report_postgres_err)?;

  let password_reset = reset_code_service::add(&mut sp, utils::hash_str(&raw_code), user.email)
    .await
    .map_err(report_postgres_err)?;

  sp.commit().await.map_err(report_postgres_err)?;

  // fill struct
  Ok(fill_password_reset(password_reset))
}

pub async fn password_reset(
  _config: Config,
  db: Db,
  _mail_service: MailService,
  props: request::PasswordResetConfirmProps,
) -> Result<response::Message, ApiError> {
  // no api key verification needed

  validate_new_password(&props.password, &props.password_confirmation)?;

  let con = &mut *db.lock().await;

  let mut sp = con.transaction().await.map_err(report_postgres_err)?;

  let result = {
    let mut store = PgStore(&mut sp);
    password_reset_flow::reset_password(
      &mut store,
      &SystemClock,
      &Argon2Hasher,
      &props.code,
      &props.password,
    )
    .await
  };

  match result {
    Ok(()) => {
      sp.commit().await.map_err(report_postgres_err)?;
      Ok(response::Message {
        message: "password has been successfully reset".to_owned(),
      })
    }
    Err(ResetFailure::CodeExpired) => {
      // the claim removed the stale code; persist that removal
      sp.commit().await.map_err(report_postgres_err)?;
      Err(ApiError::PasswordResetExpired)
    }
    // nothing to persist; dropping the transaction rolls it back
    Err(ResetFailure::CodeNotFound) => Err(ApiError::PasswordResetNonexistent),
    Err(ResetFailure::CredentialMissing) => {
      // dangling code: never a success, never a leak of which part is missing
      utils::log(utils::Event {
        msg: "reset code references a missing account".to_owned(),
        source: None,
        severity: utils::SeverityKind::Error,
      });
      Err(ApiError::InternalServerError)
    }
    Err(ResetFailure::Store(e)) => Err(report_store_err(e)),
    Err(ResetFailure::Hash(e)) => Err(report_internal_err(&*e)),
  }
}

pub async fn discount_type_new(
  _config: Config,
  db: Db,
  _mail_service: MailService,
  props: request::DiscountTypeNewProps,
) -> Result<response::DiscountType, ApiError> {
  // name isn't empty
  if props.name.is_empty() {
    return Err(ApiError::DiscountTypeNameEmpty);
  }

  let con = &mut *db.lock().await;

  // parent must exist when given
  if let Some(parent_discount_type_id) = props.parent_discount_type_id {
    if !discount_type_service::exists_by_discount_type_id(con, parent_discount_type_id)
      .await
      .map_err(report_postgres_err)?
    {
      return Err(ApiError::DiscountTypeNonexistent);
    }
  }

  let mut sp = con.transaction().await.map_err(report_postgres_err)?;

  let discount_type =
    discount_type_service::add(&mut sp, props.name, props.parent_discount_type_id)
      .await
      .map_err(report_postgres_err)?;

  sp.commit().await.map_err(report_postgres_err)?;

  // return json
  Ok(fill_discount_type(discount_type))
}

pub async fn discount_type_view(
  _config: Config,
  db: Db,
  _mail_service: MailService,
  props: request::DiscountTypeViewProps,
) -> Result<Vec<response::DiscountType>, ApiError> {
  let con = &mut *db.lock().await;

  // get discount_types
  let discount_types = discount_type_service::query(con, props)
    .await
    .map_err(report_postgres_err)?;

  Ok(
    discount_types
      .into_iter()
      .map(fill_discount_type)
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_shorter_than_six_is_rejected() {
    assert_eq!(
      validate_new_password("abc12", "abc12"),
      Err(ApiError::PasswordTooShort)
    );
  }

  #[test]
  fn six_character_password_is_accepted() {
    assert_eq!(validate_new_password("abc123", "abc123"), Ok(()));
  }

  #[test]
  fn mismatched_confirmation_is_rejected() {
    assert_eq!(
      validate_new_password("abc123", "abc124"),
      Err(ApiError::PasswordConfirmationMismatch)
    );
  }
}
