//! Payment gateway client
//!
//! Invoice creation and payment lookup against a Moyasar-style HTTP API.
//! The webhook only names a payment id; settlement re-fetches the payment
//! from the gateway and never trusts amounts carried in the webhook body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Config;
use crate::utils::{AppError, AppResult};

/// Metadata attached to an invoice so the webhook can be matched back to
/// its order without trusting client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceMetadata {
    pub order_id: i64,
    pub cart_id: i64,
    pub user_id: i64,
}

/// Invoice creation request
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub callback_url: String,
    pub metadata: InvoiceMetadata,
}

/// Created invoice
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub url: String,
    pub status: String,
    pub amount: i64,
}

/// A payment as reported by the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub source: serde_json::Value,
    pub metadata: Option<InvoiceMetadata>,
}

impl Payment {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

/// Webhook body posted by the gateway. Only the event kind and payment id
/// are used; everything else is re-fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentWebhook {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: PaymentWebhookData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentWebhookData {
    pub id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_invoice(&self, req: &InvoiceRequest) -> AppResult<Invoice>;
    async fn fetch_payment(&self, payment_id: &str) -> AppResult<Payment>;
}

/// Moyasar HTTP client
pub struct MoyasarClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MoyasarClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.payment_api_url.clone(),
            api_key: config.payment_api_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for MoyasarClient {
    async fn create_invoice(&self, req: &InvoiceRequest) -> AppResult<Invoice> {
        let resp = self
            .http
            .post(format!("{}/v1/invoices", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("Payment gateway unreachable: {e}"),
                    "تعذر الوصول إلى بوابة الدفع",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("Payment gateway rejected invoice: {}", resp.status()),
                "رفضت بوابة الدفع إنشاء الفاتورة",
            ));
        }

        resp.json::<Invoice>().await.map_err(|e| {
            AppError::dependency(
                format!("Invalid invoice response: {e}"),
                "استجابة فاتورة غير صالحة",
            )
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<Payment> {
        let resp = self
            .http
            .get(format!("{}/v1/payments/{payment_id}", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("Payment gateway unreachable: {e}"),
                    "تعذر الوصول إلى بوابة الدفع",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("Payment lookup failed: {}", resp.status()),
                "فشل البحث عن الدفعة",
            ));
        }

        resp.json::<Payment>().await.map_err(|e| {
            AppError::dependency(
                format!("Invalid payment response: {e}"),
                "استجابة دفع غير صالحة",
            )
        })
    }
}
