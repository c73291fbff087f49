//! 仓储：备货预留上限与全有或全无的出库分配

mod common;

use common::*;
use souq_server::carts;
use souq_server::db::repository::{product, warehouse};
use souq_server::orders::{OrderCreate, create_order};
use souq_server::utils::AppError;
use souq_server::warehouse::{Assignment, add_product_stock, assign_order_items};

#[tokio::test]
async fn reservations_never_exceed_product_stock() {
    let pool = test_pool().await;
    seed_product(&pool, 10, 100, 10, "cash").await;
    let a = warehouse::create(&pool, "North", "الشمال", None).await.unwrap();
    let b = warehouse::create(&pool, "South", "الجنوب", None).await.unwrap();

    add_product_stock(&pool, a.id, 10, 6).await.unwrap();

    // 6 + 5 would exceed the product's 10 units
    let over = add_product_stock(&pool, b.id, 10, 5).await;
    assert!(matches!(over, Err(AppError::BusinessRule { .. })));

    let fits = add_product_stock(&pool, b.id, 10, 4).await.unwrap();
    assert_eq!(fits.quantity, 4);

    let row = product::find_by_id(&pool, 10).await.unwrap().unwrap();
    assert_eq!(row.repo_quantity, 10);
}

#[tokio::test]
async fn short_warehouse_rolls_back_the_whole_assignment() {
    let env = test_env().await;
    let pool = &env.state.pool;
    seed_user(pool, 1, "user", 0).await;
    seed_product(pool, 10, 100, 20, "cash").await;
    let a = warehouse::create(pool, "North", "الشمال", None).await.unwrap();
    let b = warehouse::create(pool, "South", "الجنوب", None).await.unwrap();
    add_product_stock(pool, a.id, 10, 6).await.unwrap();
    add_product_stock(pool, b.id, 10, 3).await.unwrap();

    carts::add_item(pool, 1, 10, 8, vec![]).await.unwrap();
    let order_row = create_order(
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

    // the second line is short by 2; the first line's decrement must revert
    let short = assign_order_items(
        pool,
        order_row.id,
        vec![
            Assignment {
                warehouse_id: a.id,
                product_id: 10,
                quantity: 3,
            },
            Assignment {
                warehouse_id: b.id,
                product_id: 10,
                quantity: 5,
            },
        ],
    )
    .await;
    assert!(matches!(short, Err(AppError::BusinessRule { .. })));

    let a_stock = warehouse::stock(pool, a.id, 10).await.unwrap().unwrap();
    assert_eq!(a_stock.quantity, 6);
    let row = product::find_by_id(pool, 10).await.unwrap().unwrap();
    assert_eq!(row.repo_quantity, 9);

    // a covered assignment drains both warehouses and releases the reserve
    assign_order_items(
        pool,
        order_row.id,
        vec![
            Assignment {
                warehouse_id: a.id,
                product_id: 10,
                quantity: 5,
            },
            Assignment {
                warehouse_id: b.id,
                product_id: 10,
                quantity: 3,
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(warehouse::stock(pool, a.id, 10).await.unwrap().unwrap().quantity, 1);
    assert_eq!(warehouse::stock(pool, b.id, 10).await.unwrap().unwrap().quantity, 0);
    let row = product::find_by_id(pool, 10).await.unwrap().unwrap();
    assert_eq!(row.repo_quantity, 1);
}
