//! Order creation
//!
//! Snapshots the user's cart into an order split by channel, generates the
//! SMS verification code, and maintains the user's address book. A retry on
//! a cart that already has an unfinished order supersedes the old order
//! instead of stacking a duplicate.

use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use shared::models::{Channel, Order, Role};
use validator::Validate;

use crate::carts;
use crate::core::ServerState;
use crate::db::repository::order::{NewOrder, NewOrderItem};
use crate::db::repository::{cart, order, user};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Verification codes live for one hour
const CODE_TTL_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrderCreate {
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub order_notes: Option<String>,
}

impl OrderCreate {
    fn check_lengths(&self) -> AppResult<()> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.city, "city", MAX_NAME_LEN)?;
        validate_required_text(&self.area, "area", MAX_NAME_LEN)?;
        validate_required_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.email, "email", MAX_EMAIL_LEN)?;
        validate_optional_text(&self.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.order_notes, "order_notes", MAX_NOTE_LEN)?;
        Ok(())
    }
}

/// Random 6-digit verification code
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// A retry order replaces the previous attempt when that attempt is still
/// unverified, or verified but stuck before online payment.
fn supersedes(previous: &Order) -> bool {
    !previous.is_verified || previous.payment_kind.is_online_capable()
}

pub async fn create_order(
    state: &ServerState,
    user_id: i64,
    data: OrderCreate,
) -> AppResult<Order> {
    data.validate()?;
    data.check_lengths()?;

    let pool = &state.pool;
    let cart_row = cart::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;
    let cart_id = cart_row.id;
    let view = carts::build_view(pool, cart_row).await?;
    if view.split.online_items.is_empty() && view.split.cash_items.is_empty() {
        return Err(AppError::business_rule("Cart is empty", "السلة فارغة"));
    }

    // Supersede-on-retry: the query only returns still-initiated orders
    if let Some(previous) = order::find_initiated_for_cart(pool, user_id, cart_id).await?
        && supersedes(&previous)
    {
        tracing::info!(order_id = previous.id, "superseding unfinished order");
        order::hard_delete(pool, previous.id).await?;
    }

    let code = generate_code();
    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();

    let new_order = NewOrder {
        id: order_id,
        user_id,
        cart_id,
        name: data.name.clone(),
        email: data.email.clone(),
        phone: data.phone.clone(),
        city: data.city.clone(),
        area: data.area.clone(),
        address: data.address.clone(),
        postal_code: data.postal_code.clone(),
        order_notes: data.order_notes.clone(),
        total_price: view.cart.total_price,
        total_quantity: view.split.online_quantity + view.split.cash_quantity,
        online_total: view.split.online_due,
        online_quantity: view.split.online_quantity,
        cash_total: view.split.cash_due,
        cash_quantity: view.split.cash_quantity,
        verification_code_hash: hash_code(&code),
        verification_expires_at: now + CODE_TTL_MS,
        payment_kind: view.split.transaction_type,
    };

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    order::insert(&mut *tx, &new_order).await?;
    for item in &view.split.online_items {
        order::insert_item(
            &mut *tx,
            &NewOrderItem {
                order_id,
                channel: Channel::Online,
                product_id: item.product_id,
                quantity: item.quantity,
                total: item.total,
                properties: item.properties.0.clone(),
            },
        )
        .await?;
    }
    for item in &view.split.cash_items {
        order::insert_item(
            &mut *tx,
            &NewOrderItem {
                order_id,
                channel: Channel::Cash,
                product_id: item.product_id,
                quantity: item.quantity,
                total: item.total,
                properties: item.properties.0.clone(),
            },
        )
        .await?;
    }
    tx.commit().await.map_err(AppError::from)?;

    user::save_address(
        pool,
        user_id,
        &data.city,
        &data.area,
        &data.address,
        data.postal_code.as_deref(),
    )
    .await?;

    // Verification code goes out over SMS, never in the response
    let sms = state.sms.clone();
    let phone = data.phone.clone();
    tokio::spawn(async move {
        if let Err(e) = sms
            .send(&phone, &format!("Your order verification code is {code}"))
            .await
        {
            tracing::warn!("verification SMS failed: {e}");
        }
    });

    let created = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after insert"))?;

    state
        .notifier
        .notify_roles(Role::ADMINS, "new_order", &created)
        .await;

    Ok(created)
}
