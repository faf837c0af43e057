use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MailNewProps {
  pub request_id: i64,
  pub destination: String,
  pub topic: String,
  pub title: String,
  pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MailError {
  DestinationBounced,
  DestinationProhibited,
  Unknown,
}

impl MailError {
  pub fn as_str(&self) -> &'static str {
    match self {
      MailError::DestinationBounced => "DESTINATION_BOUNCED",
      MailError::DestinationProhibited => "DESTINATION_PROHIBITED",
      MailError::Unknown => "UNKNOWN",
    }
  }
}

// json client for the external mail delivery service
#[derive(Clone)]
pub struct MailService {
  url: String,
  client: reqwest::Client,
}

impl MailService {
  pub async fn new(url: &str) -> MailService {
    MailService {
      url: url.to_owned(),
      client: reqwest::Client::new(),
    }
  }

  pub async fn mail_new(&self, props: MailNewProps) -> Result<(), MailError> {
    let resp = self
      .client
      .post(format!("{}/mail/new", self.url))
      .json(&props)
      .send()
      .await
      .map_err(|_| MailError::Unknown)?;

    if resp.status().is_success() {
      Ok(())
    } else {
      // the mail service reports its own error kind in the body
      Err(resp.json::<MailError>().await.unwrap_or(MailError::Unknown))
    }
  }
}
