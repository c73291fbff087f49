//! Mail dispatch client
//!
//! Invoice emails are best-effort: callers spawn the send and log failures,
//! the purchase flow never fails on a mail error.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::Config;
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()>;
}

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// HTTP mail API client
pub struct HttpMailer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let resp = self
            .http
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&MailRequest {
                from: &self.from,
                to,
                subject,
                html: html_body,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("Mail API unreachable: {e}"),
                    "تعذر الوصول إلى خدمة البريد",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("Mail send failed: {}", resp.status()),
                "فشل إرسال البريد",
            ));
        }
        Ok(())
    }
}
