use super::db_types::*;
use super::request;
use super::utils::current_time_millis;
use tokio_postgres::GenericClient;

impl From<tokio_postgres::row::Row> for DiscountType {
  // select * from discount_type order only, otherwise it will fail
  fn from(row: tokio_postgres::row::Row) -> DiscountType {
    DiscountType {
      discount_type_id: row.get("discount_type_id"),
      creation_time: row.get("creation_time"),
      name: row.get("name"),
      parent_discount_type_id: row.get("parent_discount_type_id"),
    }
  }
}

pub async fn add(
  con: &mut impl GenericClient,
  name: String,
  parent_discount_type_id: Option<i64>,
) -> Result<DiscountType, tokio_postgres::Error> {
  let creation_time = current_time_millis();

  let discount_type_id = con
    .query_one(
      "INSERT INTO
       discount_type_t(
        creation_time,
        name,
        parent_discount_type_id
       )
       VALUES($1, $2, $3)
       RETURNING discount_type_id
      ",
      &[&creation_time, &name, &parent_discount_type_id],
    )
    .await?
    .get(0);

  // return discount type
  Ok(DiscountType {
    discount_type_id,
    creation_time,
    name,
    parent_discount_type_id,
  })
}

#[allow(unused)]
pub async fn get_by_discount_type_id(
  con: &mut impl GenericClient,
  discount_type_id: i64,
) -> Result<Option<DiscountType>, tokio_postgres::Error> {
  let result = con
    .query_opt(
      "SELECT * FROM discount_type_t WHERE discount_type_id=$1",
      &[&discount_type_id],
    )
    .await?
    .map(|row| row.into());

  Ok(result)
}

pub async fn exists_by_discount_type_id(
  con: &mut impl GenericClient,
  discount_type_id: i64,
) -> Result<bool, tokio_postgres::Error> {
  let count: i64 = con
    .query_one(
      "SELECT count(*) FROM discount_type_t WHERE discount_type_id=$1",
      &[&discount_type_id],
    )
    .await?
    .get(0);
  Ok(count != 0)
}

pub async fn query(
  con: &mut impl GenericClient,
  props: request::DiscountTypeViewProps,
) -> Result<Vec<DiscountType>, tokio_postgres::Error> {
  let sql = [
    "SELECT dt.* FROM discount_type_t dt WHERE 1 = 1",
    if props.root_only {
      " AND dt.parent_discount_type_id IS NULL"
    } else {
      ""
    },
    " AND ($1::bigint[] IS NULL OR dt.discount_type_id = ANY($1))",
    " AND ($2::bigint   IS NULL OR dt.creation_time >= $2)",
    " AND ($3::bigint   IS NULL OR dt.creation_time <= $3)",
    " AND ($4::bigint[] IS NULL OR dt.parent_discount_type_id = ANY($4))",
    " AND ($5::text[]   IS NULL OR dt.name = ANY($5))",
    " ORDER BY dt.discount_type_id",
  ]
  .join("");

  let stmnt = con.prepare(&sql).await?;

  let results = con
    .query(
      &stmnt,
      &[
        &props.discount_type_id,
        &props.min_creation_time,
        &props.max_creation_time,
        &props.parent_discount_type_id,
        &props.name,
      ],
    )
    .await?
    .into_iter()
    .map(|row| row.into())
    .collect();
  Ok(results)
}
