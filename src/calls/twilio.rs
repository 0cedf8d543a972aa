use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::TwilioConfig;

/// Places outbound voice calls. Returns the provider's call id.
#[async_trait]
pub trait CallTrigger: Send + Sync {
    async fn place_call(&self, to: &str) -> anyhow::Result<String>;
}

/// Call resource as returned by the Twilio REST API (only what we read).
#[derive(Debug, Deserialize)]
struct CallResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

pub struct TwilioClient {
    client: Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
    voice_url: String,
}

impl TwilioClient {
    pub fn new(config: &TwilioConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build().context("build http client")?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            voice_url: config.voice_url.clone(),
        })
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl CallTrigger for TwilioClient {
    async fn place_call(&self, to: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("Url", self.voice_url.as_str()),
                ("To", to),
                ("From", self.from_number.as_str()),
            ])
            .send()
            .await
            .context("twilio create call")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("twilio returned {status}: {body}");
        }

        let call: CallResource = response.json().await.context("decode twilio call")?;
        debug!(call_sid = %call.sid, status = ?call.status, "call queued");
        Ok(call.sid)
    }
}
