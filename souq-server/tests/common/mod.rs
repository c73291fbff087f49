//! 集成测试基座：内存数据库 + 外部协作方的进程内假实现
#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use souq_server::clients::{
    Invoice, InvoiceRequest, Mailer, Payment, PaymentGateway, Shipment, ShipmentRequest,
    ShippingProvider, SmsSender,
};
use souq_server::core::{Config, ServerState};
use souq_server::notify::Notifier;
use souq_server::utils::{AppError, AppResult};

/// In-memory database with the full schema applied. A single connection
/// keeps the memory database alive for the whole test.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

// ── Fake collaborators ──────────────────────────────────────────────

/// Payment gateway fake. Tests register payments the webhook will fetch.
#[derive(Default)]
pub struct FakeGateway {
    pub payments: Mutex<HashMap<String, Payment>>,
    pub invoices: Mutex<Vec<Invoice>>,
}

impl FakeGateway {
    pub fn register_payment(&self, payment: Payment) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_invoice(&self, req: &InvoiceRequest) -> AppResult<Invoice> {
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = Invoice {
            id: format!("inv_{}", invoices.len() + 1),
            url: format!("https://pay.example/{}", invoices.len() + 1),
            status: "initiated".into(),
            amount: req.amount,
        };
        invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<Payment> {
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| AppError::dependency("Payment lookup failed: 404", "فشل البحث عن الدفعة"))
    }
}

/// A gateway-side paid payment pointing at an invoice
pub fn paid_payment(id: &str, invoice_id: &str, amount: i64) -> Payment {
    Payment {
        id: id.into(),
        status: "paid".into(),
        amount,
        invoice_id: Some(invoice_id.into()),
        source: serde_json::json!({ "type": "creditcard" }),
        metadata: None,
    }
}

#[derive(Default)]
pub struct FakeShipping {
    pub shipments: Mutex<Vec<ShipmentRequest>>,
}

#[async_trait]
impl ShippingProvider for FakeShipping {
    async fn create_shipment(&self, req: &ShipmentRequest) -> AppResult<Shipment> {
        let mut shipments = self.shipments.lock().unwrap();
        shipments.push(req.clone());
        let id = format!("ship_{}", shipments.len());
        Ok(Shipment {
            id: id.clone(),
            raw: serde_json::json!({ "id": id, "status": "created" }),
        })
    }

    async fn track(&self, shipment_id: &str) -> AppResult<serde_json::Value> {
        Ok(serde_json::json!({ "id": shipment_id, "status": "in_transit" }))
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push((to.into(), subject.into()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSms {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send(&self, phone: &str, message: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.into(), message.into()));
        Ok(())
    }
}

// ── State builder ───────────────────────────────────────────────────

pub struct TestEnv {
    pub state: ServerState,
    pub gateway: Arc<FakeGateway>,
    pub shipping: Arc<FakeShipping>,
    pub mailer: Arc<FakeMailer>,
    pub sms: Arc<FakeSms>,
}

pub async fn test_env() -> TestEnv {
    let pool = test_pool().await;
    let (_layer, notifier) = Notifier::new_layer();
    let gateway = Arc::new(FakeGateway::default());
    let shipping = Arc::new(FakeShipping::default());
    let mailer = Arc::new(FakeMailer::default());
    let sms = Arc::new(FakeSms::default());

    let state = ServerState {
        config: Config::default(),
        pool,
        payment: gateway.clone(),
        shipping: shipping.clone(),
        mailer: mailer.clone(),
        sms: sms.clone(),
        notifier,
    };

    TestEnv {
        state,
        gateway,
        shipping,
        mailer,
        sms,
    }
}

// ── Seed helpers ────────────────────────────────────────────────────

pub async fn seed_user(pool: &SqlitePool, id: i64, role: &str, points: i64) {
    sqlx::query(
        "INSERT INTO user (id, name, email, phone, role, points, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0)",
    )
    .bind(id)
    .bind(format!("user-{id}"))
    .bind(format!("user{id}@example.com"))
    .bind(format!("+96650000{id:04}"))
    .bind(role)
    .bind(points)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_category(pool: &SqlitePool, id: i64) {
    sqlx::query(
        "INSERT INTO category (id, name_en, name_ar, created_at, updated_at) VALUES (?1, ?2, ?2, 0, 0)",
    )
    .bind(id)
    .bind(format!("category-{id}"))
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_product(
    pool: &SqlitePool,
    id: i64,
    price: i64,
    quantity: i64,
    payment_kind: &str,
) {
    sqlx::query(
        "INSERT INTO product (id, title_en, title_ar, price_before_discount, quantity, payment_kind, created_at, updated_at) VALUES (?1, ?2, ?2, ?3, ?4, ?5, 0, 0)",
    )
    .bind(id)
    .bind(format!("product-{id}"))
    .bind(price)
    .bind(quantity)
    .bind(payment_kind)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_product_in_category(
    pool: &SqlitePool,
    id: i64,
    price: i64,
    quantity: i64,
    payment_kind: &str,
    category_id: i64,
) {
    sqlx::query(
        "INSERT INTO product (id, title_en, title_ar, price_before_discount, quantity, payment_kind, category_id, created_at, updated_at) VALUES (?1, ?2, ?2, ?3, ?4, ?5, ?6, 0, 0)",
    )
    .bind(id)
    .bind(format!("product-{id}"))
    .bind(price)
    .bind(quantity)
    .bind(payment_kind)
    .bind(category_id)
    .execute(pool)
    .await
    .unwrap();
}

/// Point the config at known rates; the migration seeds a neutral default.
pub async fn set_points_config(
    pool: &SqlitePool,
    mode: &str,
    points_per_unit: i64,
    points_per_currency_unit: i64,
    min_points: i64,
    max_points: i64,
) {
    sqlx::query(
        "UPDATE points_config SET mode = ?1, points_per_unit = ?2, points_per_currency_unit = ?3, min_points = ?4, max_points = ?5 WHERE id = 1",
    )
    .bind(mode)
    .bind(points_per_unit)
    .bind(points_per_currency_unit)
    .bind(min_points)
    .bind(max_points)
    .execute(pool)
    .await
    .unwrap();
}

/// Replace an order's code hash with one the test knows the preimage of
pub async fn force_verification_code(pool: &SqlitePool, order_id: i64, code: &str) {
    sqlx::query("UPDATE orders SET verification_code_hash = ?1 WHERE id = ?2")
        .bind(souq_server::orders::create::hash_code(code))
        .bind(order_id)
        .execute(pool)
        .await
        .unwrap();
}
