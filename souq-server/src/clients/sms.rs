//! SMS dispatch client
//!
//! Carries the order verification code. Best-effort like mail.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::Config;
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> AppResult<()>;
}

#[derive(Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    body: &'a str,
}

/// HTTP SMS API client
pub struct HttpSmsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpSmsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.sms_api_url.clone(),
            api_key: config.sms_api_key.clone(),
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsClient {
    async fn send(&self, phone: &str, message: &str) -> AppResult<()> {
        let resp = self
            .http
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&SmsRequest {
                to: phone,
                body: message,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("SMS API unreachable: {e}"),
                    "تعذر الوصول إلى خدمة الرسائل",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("SMS send failed: {}", resp.status()),
                "فشل إرسال الرسالة",
            ));
        }
        Ok(())
    }
}
