use super::db_types::ResetCodePassword;
use super::utils::current_time_millis;
use tokio_postgres::GenericClient;

impl From<tokio_postgres::row::Row> for ResetCodePassword {
  // select * from reset_code_password order only, otherwise it will fail
  fn from(row: tokio_postgres::row::Row) -> ResetCodePassword {
    ResetCodePassword {
      code_hash: row.get("code_hash"),
      email: row.get("email"),
      creation_time: row.get("creation_time"),
    }
  }
}

pub async fn add(
  con: &mut impl GenericClient,
  code_hash: String,
  email: String,
) -> Result<ResetCodePassword, tokio_postgres::Error> {
  let creation_time = current_time_millis();
  con
    .execute(
      "
    INSERT INTO reset_code_password_t(
        code_hash,
        email,
        creation_time
    ) VALUES ($1, $2, $3)",
      &[&code_hash, &email, &creation_time],
    )
    .await?;

  Ok(ResetCodePassword {
    code_hash,
    email,
    creation_time,
  })
}

#[allow(unused)]
pub async fn get_by_code_hash(
  con: &mut impl GenericClient,
  code_hash: &str,
) -> Result<Option<ResetCodePassword>, tokio_postgres::Error> {
  let result = con
    .query_opt(
      "SELECT * FROM reset_code_password_t WHERE code_hash=$1",
      &[&code_hash],
    )
    .await?
    .map(|row| row.into());

  Ok(result)
}

// the delete doubles as the claim: under a transaction only one caller
// gets the row back
pub async fn remove_by_code_hash(
  con: &mut impl GenericClient,
  code_hash: &str,
) -> Result<Option<ResetCodePassword>, tokio_postgres::Error> {
  let result = con
    .query_opt(
      "DELETE FROM reset_code_password_t WHERE code_hash=$1 RETURNING *",
      &[&code_hash],
    )
    .await?
    .map(|row| row.into());

  Ok(result)
}

// a fresh code supersedes any outstanding code for the address
pub async fn remove_by_email(
  con: &mut impl GenericClient,
  email: &str,
) -> Result<u64, tokio_postgres::Error> {
  con
    .execute(
      "DELETE FROM reset_code_password_t WHERE email=$1",
      &[&email],
    )
    .await
}
