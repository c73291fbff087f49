//! 积分：动态抵扣、封顶与拒绝、静态兑现的受理与驳回

mod common;

use common::*;
use souq_server::carts;
use souq_server::db::repository::{cart, points as points_repo, user};
use souq_server::points::{
    accept_static_request, redeem_on_cart, reject_static_request, request_static_payout,
};
use souq_server::utils::AppError;

#[tokio::test]
async fn dynamic_redeem_records_the_deduction_and_burns_usable_points() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 500).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    // 10 points buy one currency unit, up to 1000 points per redemption
    set_points_config(&pool, "dynamic", 0, 10, 0, 1000).await;

    carts::add_item(&pool, 1, 10, 2, vec![]).await.unwrap();
    let view = redeem_on_cart(&pool, 1).await.unwrap();

    // the stored total stays gross; the deduction reduces the dues
    assert_eq!(view.cart.total_price, 200);
    assert_eq!(view.cart.total_used_from_points, 50);
    assert!(view.cart.is_points_used);
    assert_eq!(view.split.cash_due, 150);
    // all usable points are consumed, not just the floored value's cost
    assert_eq!(user::find_by_id(&pool, 1).await.unwrap().unwrap().points, 0);
}

#[tokio::test]
async fn points_apply_once_per_cart() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 500).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    set_points_config(&pool, "dynamic", 0, 10, 0, 1000).await;

    carts::add_item(&pool, 1, 10, 2, vec![]).await.unwrap();
    redeem_on_cart(&pool, 1).await.unwrap();

    // refill the account; the cart guard must still refuse a second pass
    sqlx::query("UPDATE user SET points = 500 WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();
    let second = redeem_on_cart(&pool, 1).await;
    assert!(matches!(second, Err(AppError::BusinessRule { .. })));

    let cart_row = cart::find_by_user(&pool, 1).await.unwrap().unwrap();
    assert_eq!(cart_row.total_used_from_points, 50);
}

#[tokio::test]
async fn exact_cover_redeem_is_clamped_to_eighty_percent() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 2000).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    set_points_config(&pool, "dynamic", 0, 10, 0, 5000).await;

    carts::add_item(&pool, 1, 10, 2, vec![]).await.unwrap();
    let view = redeem_on_cart(&pool, 1).await.unwrap();

    // 200 of value against a 200 cart: clamped to 160, total untouched
    assert_eq!(view.cart.total_used_from_points, 160);
    assert_eq!(view.cart.total_price, 200);
    assert_eq!(view.split.cash_due, 40);
    assert_eq!(user::find_by_id(&pool, 1).await.unwrap().unwrap().points, 0);
}

#[tokio::test]
async fn deduction_above_the_cart_total_is_rejected() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 5000).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    set_points_config(&pool, "dynamic", 0, 10, 0, 5000).await;

    carts::add_item(&pool, 1, 10, 2, vec![]).await.unwrap();
    // 500 of value against a 200 cart
    let too_rich = redeem_on_cart(&pool, 1).await;
    assert!(matches!(too_rich, Err(AppError::BusinessRule { .. })));

    let cart_row = cart::find_by_user(&pool, 1).await.unwrap().unwrap();
    assert!(!cart_row.is_points_used);
    assert_eq!(
        user::find_by_id(&pool, 1).await.unwrap().unwrap().points,
        5000
    );
}

#[tokio::test]
async fn redeem_requires_dynamic_mode_and_min_points() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 30).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();

    set_points_config(&pool, "static", 0, 10, 0, 1000).await;
    let wrong_mode = redeem_on_cart(&pool, 1).await;
    assert!(matches!(wrong_mode, Err(AppError::BusinessRule { .. })));

    set_points_config(&pool, "dynamic", 0, 10, 50, 1000).await;
    let below_min = redeem_on_cart(&pool, 1).await;
    assert!(matches!(below_min, Err(AppError::BusinessRule { .. })));
}

#[tokio::test]
async fn static_request_holds_points_until_review() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 50).await;
    // 7 points per unit: 50 points are worth 7
    set_points_config(&pool, "static", 0, 7, 0, 1000).await;

    let request = request_static_payout(&pool, 1).await.unwrap();
    assert_eq!(request.amount, 7);
    assert_eq!(request.points, 50);
    // nothing burned until an admin accepts
    assert_eq!(user::find_by_id(&pool, 1).await.unwrap().unwrap().points, 50);

    // one open request per user
    let again = request_static_payout(&pool, 1).await;
    assert!(matches!(again, Err(AppError::BusinessRule { .. })));
}

#[tokio::test]
async fn accept_applies_the_deduction_to_the_cart() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 100).await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    set_points_config(&pool, "static", 0, 10, 0, 1000).await;

    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();
    let request = request_static_payout(&pool, 1).await.unwrap();

    accept_static_request(&pool, request.id).await.unwrap();

    let cart_row = cart::find_by_user(&pool, 1).await.unwrap().unwrap();
    assert!(cart_row.is_points_used);
    assert_eq!(cart_row.total_used_from_points, 10);
    assert_eq!(cart_row.total_price, 100);
    assert_eq!(user::find_by_id(&pool, 1).await.unwrap().unwrap().points, 0);
    assert!(points_repo::find_static_request(&pool, request.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn reject_discards_the_request_and_keeps_the_points() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 100).await;
    set_points_config(&pool, "static", 0, 10, 0, 1000).await;

    let request = request_static_payout(&pool, 1).await.unwrap();
    reject_static_request(&pool, request.id).await.unwrap();

    assert!(points_repo::find_static_request(&pool, request.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        user::find_by_id(&pool, 1).await.unwrap().unwrap().points,
        100
    );
    // the request is gone, a fresh one may be filed
    request_static_payout(&pool, 1).await.unwrap();
}
