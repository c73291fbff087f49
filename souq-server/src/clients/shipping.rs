//! Shipping provider client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Config;
use crate::utils::{AppError, AppResult};

/// Shipment creation request — the order snapshot the carrier needs
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRequest {
    pub order_id: i64,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub cash_amount: i64,
    pub total_quantity: i64,
}

/// Carrier response; `raw` is stored verbatim on the order for tracking
#[derive(Debug, Clone, Deserialize)]
pub struct Shipment {
    pub id: String,
    #[serde(default)]
    pub raw: serde_json::Value,
}

#[async_trait]
pub trait ShippingProvider: Send + Sync {
    async fn create_shipment(&self, req: &ShipmentRequest) -> AppResult<Shipment>;
    async fn track(&self, shipment_id: &str) -> AppResult<serde_json::Value>;
}

/// HTTP carrier client
pub struct HttpShippingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpShippingClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.shipping_api_url.clone(),
            api_key: config.shipping_api_key.clone(),
        }
    }
}

#[async_trait]
impl ShippingProvider for HttpShippingClient {
    async fn create_shipment(&self, req: &ShipmentRequest) -> AppResult<Shipment> {
        let resp = self
            .http
            .post(format!("{}/shipments", self.base_url))
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("Shipping provider unreachable: {e}"),
                    "تعذر الوصول إلى شركة الشحن",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("Shipment creation failed: {}", resp.status()),
                "فشل إنشاء الشحنة",
            ));
        }

        let raw: serde_json::Value = resp.json().await.map_err(|e| {
            AppError::dependency(
                format!("Invalid shipment response: {e}"),
                "استجابة شحن غير صالحة",
            )
        })?;
        let id = raw
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(Shipment { id, raw })
    }

    async fn track(&self, shipment_id: &str) -> AppResult<serde_json::Value> {
        let resp = self
            .http
            .get(format!("{}/shipments/{shipment_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    format!("Shipping provider unreachable: {e}"),
                    "تعذر الوصول إلى شركة الشحن",
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::dependency(
                format!("Tracking lookup failed: {}", resp.status()),
                "فشل تتبع الشحنة",
            ));
        }

        resp.json().await.map_err(|e| {
            AppError::dependency(
                format!("Invalid tracking response: {e}"),
                "استجابة تتبع غير صالحة",
            )
        })
    }
}
