//! External collaborator clients
//!
//! Payment gateway, shipping provider, mail and SMS dispatch. Each concern
//! is a trait so tests can swap in-process fakes; the production impls are
//! thin reqwest wrappers.

pub mod mailer;
pub mod payment;
pub mod shipping;
pub mod sms;

pub use mailer::{HttpMailer, Mailer};
pub use payment::{
    Invoice, InvoiceMetadata, InvoiceRequest, MoyasarClient, Payment, PaymentGateway,
    PaymentWebhook, PaymentWebhookData,
};
pub use shipping::{HttpShippingClient, Shipment, ShipmentRequest, ShippingProvider};
pub use sms::{HttpSmsClient, SmsSender};
