//! Order lifecycle
//!
//! Creation snapshots the cart, verification proves phone ownership,
//! settlement applies the purchase side effects exactly once, shipping
//! hands the order to the carrier.

pub mod create;
pub mod settlement;
pub mod shipping;
pub mod verify;

pub use create::{OrderCreate, create_order};
pub use settlement::{handle_payment_webhook, settle_order};
pub use shipping::{send_to_delivery, track_order};
pub use verify::{OnlineInvoice, VerifyOrder, create_online_invoice, verify_order};
