use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};
use warp::Filter;

use mail_service::MailService;

mod utils;

mod api;
mod handlers;
mod request;
mod response;

// injected capabilities
mod clock;
mod hasher;

// the reset flow and its stores
mod password_reset_flow;
mod pg_store;

// database interface
mod db_types;
mod discount_type_service;
mod reset_code_service;
mod user_service;

// external mail delivery
mod mail_service;

static SERVICE_NAME: &str = "shop-service";

#[derive(Parser, Clone)]
struct Opts {
  #[arg(short, long)]
  port: u16,
  #[arg(short, long)]
  site_external_url: String,
  #[arg(short, long)]
  database_url: String,
  #[arg(short, long)]
  mail_service_url: String,
}

pub type Db = Arc<Mutex<Client>>;

#[derive(Clone)]
pub struct Config {
  pub site_external_url: String,
}

#[tokio::main]
async fn main() -> Result<(), tokio_postgres::Error> {
  let Opts {
    port,
    database_url,
    mail_service_url,
    site_external_url,
  } = Opts::parse();

  let (client, connection) = loop {
    match tokio_postgres::connect(&database_url, NoTls).await {
      Ok(v) => break v,
      Err(e) => utils::log(utils::Event {
        msg: e.to_string(),
        source: e.source().map(|x| x.to_string()),
        severity: utils::SeverityKind::Error,
      }),
    }

    // sleep for 5 seconds
    std::thread::sleep(std::time::Duration::from_secs(5));
  };

  // The connection object performs the actual communication with the database,
  // so spawn it off to run on its own.
  tokio::spawn(async move {
    if let Err(e) = connection.await {
      eprintln!("connection error: {}", e);
    }
  });

  let db: Db = Arc::new(Mutex::new(client));

  // open connection to mail service
  let mail_service = MailService::new(&mail_service_url).await;

  let api = api::api(Config { site_external_url }, db, mail_service);

  let log = warp::log::custom(|info| {
    // Use a log macro, or slog, or println, or whatever!
    utils::log(utils::Event {
      msg: info.method().to_string(),
      source: Some(info.path().to_string()),
      severity: utils::SeverityKind::Info,
    });
  });

  warp::serve(api.with(log)).run(([0, 0, 0, 0], port)).await;

  Ok(())
}
