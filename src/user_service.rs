use super::db_types::*;
use tokio_postgres::GenericClient;

impl From<tokio_postgres::row::Row> for User {
  // select * from user order only, otherwise it will fail
  fn from(row: tokio_postgres::row::Row) -> User {
    User {
      user_id: row.get("user_id"),
      creation_time: row.get("creation_time"),
      email: row.get("email"),
      password_hash: row.get("password_hash"),
    }
  }
}

pub async fn get_by_email(
  con: &mut impl GenericClient,
  email: &str,
) -> Result<Option<User>, tokio_postgres::Error> {
  let result = con
    .query_opt("SELECT * FROM user_t WHERE email=$1", &[&email])
    .await?
    .map(|row| row.into());

  Ok(result)
}

#[allow(unused)]
pub async fn get_by_user_id(
  con: &mut impl GenericClient,
  user_id: i64,
) -> Result<Option<User>, tokio_postgres::Error> {
  let result = con
    .query_opt("SELECT * FROM user_t WHERE user_id=$1", &[&user_id])
    .await?
    .map(|row| row.into());

  Ok(result)
}

pub async fn update_password_hash(
  con: &mut impl GenericClient,
  user_id: i64,
  password_hash: &str,
) -> Result<u64, tokio_postgres::Error> {
  con
    .execute(
      "UPDATE user_t SET password_hash=$1 WHERE user_id=$2",
      &[&password_hash, &user_id],
    )
    .await
}
