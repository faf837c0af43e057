use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_time_millis() -> i64 {
  let since_the_epoch = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .expect("time went backwards");

  since_the_epoch.as_millis() as i64
}

pub fn gen_random_string() -> String {
  // encode 32 bytes of random in base64
  base64_url::encode(&thread_rng().gen::<[u8; 32]>())
}

pub fn hash_str(key: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(key);
  let result = hasher.finalize();
  base64_url::encode(&result)
}

// fun error handling stuff

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityKind {
  Info,
  Warning,
  Error,
  Fatal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub msg: String,
  pub source: Option<String>,
  pub severity: SeverityKind,
}

pub fn log(e: Event) {
  println!("{}", serde_json::to_string(&e).unwrap());
}
