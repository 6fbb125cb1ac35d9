use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::ports::Notifier;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    to: &'a str,
    body: String,
}

// Thin reqwest client for the HTTP SMS gateway.
#[derive(Clone)]
pub struct SmsGatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SmsGatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Notifier for SmsGatewayClient {
    async fn send(&self, phone: &str, code: &str) -> Result<(), String> {
        // Compose the gateway URL and POST the message payload.
        let url = format!("{}/messages", self.base_url);
        let body = format!("Your verification code is {code}. It expires in 5 minutes.");
        let response = self
            .http
            .post(url)
            .header("x-api-key", &self.api_key)
            .json(&SendMessageRequest { to: phone, body })
            .send()
            .await
            .map_err(|err| format!("sms transport error: {err}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("sms gateway error {status}"));
        }

        Ok(())
    }
}
