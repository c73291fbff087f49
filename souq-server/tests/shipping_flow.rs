//! 物流：移交承运与跟踪

mod common;

use common::*;
use shared::models::OrderStatus;
use souq_server::carts;
use souq_server::db::repository::order;
use souq_server::orders::{
    OrderCreate, VerifyOrder, create_order, send_to_delivery, track_order, verify_order,
};
use souq_server::utils::AppError;

async fn settled_cash_order(env: &TestEnv) -> i64 {
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 20, 40, 10, "cash").await;
    carts::add_item(pool, 1, 20, 2, vec![]).await.unwrap();

    let created = create_order(
        &env.state,
        1,
        OrderCreate {
            name: "Omar".into(),
            email: None,
            phone: "+966500002222".into(),
            city: "Jeddah".into(),
            area: "Al Balad".into(),
            address: "Corniche 5".into(),
            postal_code: None,
            order_notes: None,
        },
    )
    .await
    .unwrap();
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
    created.id
}

#[tokio::test]
async fn verified_order_ships_and_tracks() {
    let env = test_env().await;
    let pool = &env.state.pool;
    let order_id = settled_cash_order(&env).await;

    let shipped = send_to_delivery(&env.state, order_id).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::OnGoing);
    assert!(shipped.send_to_delivery);
    assert!(shipped.tracking.is_some());

    // the carrier got the cash amount to collect
    let requests = env.shipping.shipments.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].cash_amount, 80);
    drop(requests);

    let tracking = track_order(&env.state, order_id).await.unwrap();
    assert_eq!(tracking["status"], "in_transit");

    // the carrier payload is mirrored onto the order
    let row = order::find_by_id(pool, order_id).await.unwrap().unwrap();
    assert_eq!(row.tracking.unwrap().0["status"], "in_transit");

    // shipping twice is rejected
    let again = send_to_delivery(&env.state, order_id).await;
    assert!(matches!(again, Err(AppError::BusinessRule { .. })));

    let row = order::find_by_id(pool, order_id).await.unwrap().unwrap();
    assert_eq!(row.status, OrderStatus::OnGoing);
}

#[tokio::test]
async fn unverified_order_cannot_ship() {
    let env = test_env().await;
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 20, 40, 10, "cash").await;
    carts::add_item(pool, 1, 20, 1, vec![]).await.unwrap();

    let created = create_order(
        &env.state,
        1,
        OrderCreate {
            name: "Omar".into(),
            email: None,
            phone: "+966500002222".into(),
            city: "Jeddah".into(),
            area: "Al Balad".into(),
            address: "Corniche 5".into(),
            postal_code: None,
            order_notes: None,
        },
    )
    .await
    .unwrap();

    let early = send_to_delivery(&env.state, created.id).await;
    assert!(matches!(early, Err(AppError::BusinessRule { .. })));
}

#[tokio::test]
async fn tracking_requires_a_shipment() {
    let env = test_env().await;
    let order_id = settled_cash_order(&env).await;

    let untracked = track_order(&env.state, order_id).await;
    assert!(matches!(untracked, Err(AppError::BusinessRule { .. })));
}
