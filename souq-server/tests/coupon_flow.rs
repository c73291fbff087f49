//! 优惠券：使用上限、有效期窗口、营销分佣

mod common;

use common::*;
use shared::models::CouponKind;
use souq_server::carts;
use souq_server::coupons::{self, CouponCreate, DepartmentSelector};
use souq_server::db::repository::{cart, user};
use souq_server::orders::{OrderCreate, VerifyOrder, create_order, verify_order};
use souq_server::utils::AppError;

fn normal_coupon(code: &str, discount: i64, usage_limit: i64) -> CouponCreate {
    CouponCreate {
        code: code.into(),
        kind: CouponKind::Normal,
        discount,
        usage_limit,
        starts_at: None,
        ends_at: None,
        marketer_id: None,
        commission_percent: None,
        department: DepartmentSelector::AllProducts,
    }
}

#[tokio::test]
async fn discount_applies_to_eligible_lines_only() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 0).await;
    seed_product(&pool, 10, 100, 10, "online").await;
    seed_product(&pool, 20, 50, 10, "cash").await;

    let mut data = normal_coupon("TEN", 10, 5);
    data.department = DepartmentSelector::Products(vec![10]);
    coupons::create(&pool, data).await.unwrap();

    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();
    carts::add_item(&pool, 1, 20, 1, vec![]).await.unwrap();

    let view = coupons::apply_to_cart(&pool, 1, "TEN").await.unwrap();
    // 10% off the eligible 100, the cash line untouched
    assert_eq!(view.cart.total_price, 140);
    assert!(view.cart.coupon_used);

    // the discount is persisted on the line itself
    assert_eq!(view.split.online_items[0].total, 90);
    assert_eq!(view.split.cash_items[0].total, 50);
}

#[tokio::test]
async fn discounted_totals_flow_into_the_order_snapshot() {
    let env = test_env().await;
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 10, 1000, 10, "online").await;
    coupons::create(pool, normal_coupon("TEN", 10, 5)).await.unwrap();

    carts::add_item(pool, 1, 10, 1, vec![]).await.unwrap();
    coupons::apply_to_cart(pool, 1, "TEN").await.unwrap();

    let created = create_order(
        &env.state,
        1,
        OrderCreate {
            name: "Sara".into(),
            email: None,
            phone: "+966500001111".into(),
            city: "Riyadh".into(),
            area: "Olaya".into(),
            address: "King Fahd Rd 1".into(),
            postal_code: None,
            order_notes: None,
        },
    )
    .await
    .unwrap();

    // the online channel charges the discounted amount
    assert_eq!(created.total_price, 900);
    assert_eq!(created.online_total, 900);
}

#[tokio::test]
async fn second_use_past_the_limit_is_rejected() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 0).await;
    seed_product(&pool, 10, 100, 10, "online").await;
    coupons::create(&pool, normal_coupon("ONCE", 10, 1)).await.unwrap();

    let view = carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();
    coupons::apply_to_cart(&pool, 1, "ONCE").await.unwrap();

    // a fresh cart, same user: the per-user count is already exhausted
    cart::delete(&pool, view.cart.id).await.unwrap();
    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();

    let second = coupons::apply_to_cart(&pool, 1, "ONCE").await;
    assert!(matches!(second, Err(AppError::BusinessRule { .. })));

    // the pre-check reports the same exhaustion without counting a use
    let preview = coupons::precheck(&pool, 1, "ONCE").await;
    assert!(matches!(preview, Err(AppError::BusinessRule { .. })));
}

#[tokio::test]
async fn double_apply_on_one_cart_is_rejected() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 0).await;
    seed_product(&pool, 10, 100, 10, "online").await;
    coupons::create(&pool, normal_coupon("A", 10, 5)).await.unwrap();
    coupons::create(&pool, normal_coupon("B", 20, 5)).await.unwrap();

    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();
    coupons::apply_to_cart(&pool, 1, "A").await.unwrap();

    let stacked = coupons::apply_to_cart(&pool, 1, "B").await;
    assert!(matches!(stacked, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn expired_window_is_rejected() {
    let pool = test_pool().await;
    seed_user(&pool, 1, "user", 0).await;
    seed_product(&pool, 10, 100, 10, "online").await;

    let mut data = normal_coupon("OLD", 10, 5);
    data.ends_at = Some(1);
    coupons::create(&pool, data).await.unwrap();

    carts::add_item(&pool, 1, 10, 1, vec![]).await.unwrap();
    let expired = coupons::apply_to_cart(&pool, 1, "OLD").await;
    assert!(matches!(expired, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn marketing_commission_floors_only_at_settlement() {
    let env = test_env().await;
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_user(pool, 99, "marketer", 0).await;
    seed_product(pool, 10, 999, 10, "cash").await;

    coupons::create(
        pool,
        CouponCreate {
            code: "MKT".into(),
            kind: CouponKind::Marketing,
            discount: 10,
            usage_limit: 1,
            starts_at: None,
            ends_at: None,
            marketer_id: Some(99),
            commission_percent: Some(10),
            department: DepartmentSelector::Products(vec![10]),
        },
    )
    .await
    .unwrap();

    carts::add_item(pool, 1, 10, 1, vec![]).await.unwrap();
    let view = coupons::apply_to_cart(pool, 1, "MKT").await.unwrap();
    // exact 99.9 held on the cart, floor deferred to payout
    assert_eq!(view.cart.coupon_commission.as_deref(), Some("99.9"));
    assert_eq!(view.cart.total_price, 900);

    let created = create_order(
        &env.state,
        1,
        OrderCreate {
            name: "Sara".into(),
            email: None,
            phone: "+966500001111".into(),
            city: "Riyadh".into(),
            area: "Olaya".into(),
            address: "King Fahd Rd 1".into(),
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

    let marketer = user::find_by_id(pool, 99).await.unwrap().unwrap();
    assert_eq!(marketer.total_commission, 99);

    let recorded: i64 =
        sqlx::query_scalar("SELECT commission FROM marketer_commission WHERE marketer_id = 99")
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(recorded, 99);
}
