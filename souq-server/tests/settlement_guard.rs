//! 结算防护：回调重放、金额不符、失败事件

mod common;

use common::*;
use shared::models::{OrderStatus, PaymentStatus};
use souq_server::carts;
use souq_server::clients::{PaymentWebhook, PaymentWebhookData};
use souq_server::db::repository::{cart, order, product};
use souq_server::orders::{
    OrderCreate, VerifyOrder, create_online_invoice, create_order, handle_payment_webhook,
    verify_order,
};
use souq_server::utils::AppError;

fn checkout() -> OrderCreate {
    OrderCreate {
        name: "Omar".into(),
        email: None,
        phone: "+966500002222".into(),
        city: "Jeddah".into(),
        area: "Al Balad".into(),
        address: "Corniche 5".into(),
        postal_code: None,
        order_notes: None,
    }
}

fn webhook(payment_id: &str) -> PaymentWebhook {
    PaymentWebhook {
        kind: "payment_paid".into(),
        data: PaymentWebhookData {
            id: payment_id.into(),
        },
    }
}

/// Build a verified online order with its invoice attached
async fn verified_online_order(env: &TestEnv) -> (i64, String) {
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 10, 100, 10, "online").await;
    carts::add_item(pool, 1, 10, 2, vec![]).await.unwrap();

    let created = create_order(&env.state, 1, checkout()).await.unwrap();
    force_verification_code(pool, created.id, "123456").await;
    verify_order(
        &env.state,
        1,
        VerifyOrder {
            order_id: created.id,
            code: "123456".into(),
        },
    )
    .await
    .unwrap();
    let invoice = create_online_invoice(&env.state, 1, created.id).await.unwrap();
    (created.id, invoice.invoice_id)
}

#[tokio::test]
async fn replayed_webhook_settles_nothing_twice() {
    let env = test_env().await;
    let pool = &env.state.pool;
    let (order_id, invoice_id) = verified_online_order(&env).await;

    env.gateway
        .register_payment(paid_payment("pay_1", &invoice_id, 200));
    handle_payment_webhook(&env.state, webhook("pay_1")).await.unwrap();
    assert_eq!(product::find_by_id(pool, 10).await.unwrap().unwrap().quantity, 8);

    // the replay finds no cart to consume and aborts wholesale
    let replay = handle_payment_webhook(&env.state, webhook("pay_1")).await;
    assert!(matches!(replay, Err(AppError::NotFound { .. })));
    assert_eq!(product::find_by_id(pool, 10).await.unwrap().unwrap().quantity, 8);

    let row = order::find_by_id(pool, order_id).await.unwrap().unwrap();
    assert_eq!(row.status, OrderStatus::Created);
}

#[tokio::test]
async fn amount_mismatch_is_rejected_without_side_effects() {
    let env = test_env().await;
    let pool = &env.state.pool;
    let (order_id, invoice_id) = verified_online_order(&env).await;

    env.gateway
        .register_payment(paid_payment("pay_1", &invoice_id, 199));
    let short = handle_payment_webhook(&env.state, webhook("pay_1")).await;
    assert!(matches!(short, Err(AppError::Unauthorized { .. })));

    // untouched: stock, order state, and the cart
    assert_eq!(product::find_by_id(pool, 10).await.unwrap().unwrap().quantity, 10);
    let row = order::find_by_id(pool, order_id).await.unwrap().unwrap();
    assert_eq!(row.status, OrderStatus::Initiated);
    assert_eq!(row.payment_status, PaymentStatus::PaymentNotPaid);
    assert!(cart::find_by_user(pool, 1).await.unwrap().is_some());
}

#[tokio::test]
async fn unpaid_payment_state_is_rejected() {
    let env = test_env().await;
    let (_, invoice_id) = verified_online_order(&env).await;

    let mut payment = paid_payment("pay_1", &invoice_id, 200);
    payment.status = "initiated".into();
    env.gateway.register_payment(payment);

    let pending = handle_payment_webhook(&env.state, webhook("pay_1")).await;
    assert!(matches!(pending, Err(AppError::Unauthorized { .. })));
}

#[tokio::test]
async fn unverified_order_cannot_settle() {
    let env = test_env().await;
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 10, 100, 10, "online").await;
    carts::add_item(pool, 1, 10, 2, vec![]).await.unwrap();
    let created = create_order(&env.state, 1, checkout()).await.unwrap();

    // an invoice forced onto a never-verified order
    sqlx::query("UPDATE orders SET invoice_id = 'inv_x' WHERE id = ?")
        .bind(created.id)
        .execute(pool)
        .await
        .unwrap();
    env.gateway.register_payment(paid_payment("pay_1", "inv_x", 200));

    let early = handle_payment_webhook(&env.state, webhook("pay_1")).await;
    assert!(matches!(early, Err(AppError::BusinessRule { .. })));

    assert_eq!(product::find_by_id(pool, 10).await.unwrap().unwrap().quantity, 10);
    let row = order::find_by_id(pool, created.id).await.unwrap().unwrap();
    assert_eq!(row.status, OrderStatus::Initiated);
}

#[tokio::test]
async fn failed_event_marks_the_payment_failed() {
    let env = test_env().await;
    let pool = &env.state.pool;
    let (order_id, invoice_id) = verified_online_order(&env).await;

    env.gateway
        .register_payment(paid_payment("pay_1", &invoice_id, 200));
    handle_payment_webhook(
        &env.state,
        PaymentWebhook {
            kind: "payment_failed".into(),
            data: PaymentWebhookData { id: "pay_1".into() },
        },
    )
    .await
    .unwrap();

    let row = order::find_by_id(pool, order_id).await.unwrap().unwrap();
    assert_eq!(row.payment_status, PaymentStatus::PaymentFailed);
    // nothing settled
    assert_eq!(product::find_by_id(pool, 10).await.unwrap().unwrap().quantity, 10);
}
