use super::handlers;
use super::mail_service::MailService;
use super::response::ApiError;
use super::utils;
use super::Config;
use super::Db;
use super::SERVICE_NAME;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use warp::http::StatusCode;
use warp::Filter;

/// Helper to combine the multiple filters together with Filter::or, possibly boxing the types in
/// the process. This greatly helps the build times for `ipfs-http`.
/// https://github.com/seanmonstar/warp/issues/507#issuecomment-615974062
macro_rules! combine {
  ($x:expr, $($y:expr),+) => {{
      let filter = ($x).boxed();
      $( let filter = (filter.or($y)).boxed(); )+
      filter
  }}
}

/// The function that will show all ones to call
pub fn api(
  config: Config,
  db: Db,
  mail_service: MailService,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
  // public API
  api_info()
    .or(combine!(
      adapter(
        config.clone(),
        db.clone(),
        mail_service.clone(),
        warp::path!("public" / "password_reset" / "new"),
        handlers::password_reset_new,
      ),
      adapter(
        config.clone(),
        db.clone(),
        mail_service.clone(),
        warp::path!("public" / "password_reset" / "reset"),
        handlers::password_reset,
      ),
      adapter(
        config.clone(),
        db.clone(),
        mail_service.clone(),
        warp::path!("public" / "discount_type" / "new"),
        handlers::discount_type_new,
      ),
      adapter(
        config.clone(),
        db.clone(),
        mail_service.clone(),
        warp::path!("public" / "discount_type" / "view"),
        handlers::discount_type_view,
      )
    ))
    .recover(handle_rejection)
}

fn api_info() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  let mut info = HashMap::new();
  info.insert("version", "0.1");
  info.insert("name", SERVICE_NAME);
  warp::path!("info").map(move || warp::reply::json(&info))
}

// this function adapts a handler function to a warp filter
// it accepts an initial path filter
fn adapter<PropsType, ResponseType, F>(
  config: Config,
  db: Db,
  mail_service: MailService,
  filter: impl Filter<Extract = (), Error = warp::Rejection> + Clone,
  handler: fn(Config, Db, MailService, PropsType) -> F,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
where
  F: Future<Output = Result<ResponseType, ApiError>> + Send,
  PropsType: Send + serde::de::DeserializeOwned,
  ResponseType: Send + serde::ser::Serialize,
{
  // lets you pass in an arbitrary parameter
  fn with<T: Clone + Send>(t: T) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || t.clone())
  }

  filter
    .and(with(config))
    .and(with(db))
    .and(with(mail_service))
    .and(warp::body::json())
    .and_then(move |config, db, mail_service, props| async move {
      handler(config, db, mail_service, props)
        .await
        .map_err(api_error)
    })
    .map(|x: ResponseType| warp::reply::json(&x))
}

fn status_for(e: &ApiError) -> StatusCode {
  match e {
    ApiError::PasswordResetExpired => StatusCode::UNPROCESSABLE_ENTITY,
    ApiError::NotFound => StatusCode::NOT_FOUND,
    ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    ApiError::InternalServerError | ApiError::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    _ => StatusCode::BAD_REQUEST,
  }
}

// This function receives a `Rejection` and tries to return a custom
// value, otherwise simply passes the rejection along.
async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
  let message;

  if err.is_not_found() {
    message = ApiError::NotFound;
  } else if err
    .find::<warp::filters::body::BodyDeserializeError>()
    .is_some()
  {
    message = ApiError::DecodeError;
  } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
    message = ApiError::MethodNotAllowed;
  } else if let Some(ApiErrorRejection(api_error)) = err.find() {
    message = api_error.clone();
  } else {
    // We should have expected this... Just log and say its a 500
    utils::log(utils::Event {
      msg: "intercepted unknown error kind".to_owned(),
      source: None,
      severity: utils::SeverityKind::Error,
    });
    message = ApiError::Unknown;
  }

  let code = status_for(&message);

  Ok(warp::reply::with_status(
    warp::reply::json(&super::response::Message {
      message: message.message().to_owned(),
    }),
    code,
  ))
}

// This type represents errors that we can generate
// These will be automatically converted to a proper string later
#[derive(Debug)]
pub struct ApiErrorRejection(pub ApiError);
impl warp::reject::Reject for ApiErrorRejection {}

fn api_error(api_error: ApiError) -> warp::reject::Rejection {
  warp::reject::custom(ApiErrorRejection(api_error))
}

#[cfg(test)]
mod tests {
  use super::*;
  use warp::Reply;

  async fn rejection_status(err: warp::Rejection) -> StatusCode {
    handle_rejection(err).await.unwrap().into_response().status()
  }

  #[tokio::test]
  async fn expired_code_maps_to_422_with_tailored_message() {
    let status = rejection_status(api_error(ApiError::PasswordResetExpired)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ApiError::PasswordResetExpired.message(), "code is expired");
  }

  #[tokio::test]
  async fn domain_validation_failures_map_to_400() {
    for e in [
      ApiError::PasswordResetNonexistent,
      ApiError::PasswordTooShort,
      ApiError::PasswordConfirmationMismatch,
    ] {
      assert_eq!(rejection_status(api_error(e)).await, StatusCode::BAD_REQUEST);
    }
  }

  #[tokio::test]
  async fn internal_failures_map_to_opaque_500() {
    let status = rejection_status(api_error(ApiError::InternalServerError)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[tokio::test]
  async fn unknown_paths_map_to_404() {
    let status = rejection_status(warp::reject::not_found()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
