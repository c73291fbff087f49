//! Coupon engine
//!
//! Department selector resolution, discount application on carts, the
//! validity pre-check, and admin CRUD. Marketing commission is kept exact
//! (decimal) while it accumulates and only floored when paid out.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use shared::models::{Coupon, CouponKind};
use sqlx::SqlitePool;
use std::str::FromStr;
use validator::Validate;

use crate::carts::{self, CartView};
use crate::db::repository::{cart, coupon, product};
use crate::utils::{AppError, AppResult};

/// Which products a coupon covers. Resolved to a concrete product id set
/// when the coupon is created or updated.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "key", content = "value")]
pub enum DepartmentSelector {
    #[serde(rename = "allProducts")]
    AllProducts,
    #[serde(rename = "products")]
    Products(Vec<i64>),
    #[serde(rename = "categories")]
    Categories(Vec<i64>),
    #[serde(rename = "subcategories")]
    SubCategories(Vec<i64>),
}

/// Materialize the selector into product ids
pub async fn resolve_selector(
    pool: &SqlitePool,
    selector: &DepartmentSelector,
) -> AppResult<Vec<i64>> {
    let ids = match selector {
        DepartmentSelector::AllProducts => product::all_ids(pool).await?,
        DepartmentSelector::Products(ids) => ids.clone(),
        DepartmentSelector::Categories(ids) => product::ids_by_categories(pool, ids).await?,
        DepartmentSelector::SubCategories(ids) => product::ids_by_sub_categories(pool, ids).await?,
    };
    Ok(ids)
}

// ── Pure discount / commission math ─────────────────────────────────

/// Percent discount on one line total, floored to currency units
pub fn discount_amount(line_total: i64, discount_percent: i64) -> i64 {
    line_total * discount_percent / 100
}

/// Exact commission for a marketing coupon use, before any flooring
pub fn commission_exact(eligible_total: i64, commission_percent: i64) -> Decimal {
    Decimal::from(eligible_total) * Decimal::from(commission_percent) / Decimal::from(100)
}

/// Accumulate an exact commission onto the cart's stored decimal string
pub fn accumulate_commission(existing: Option<&str>, add: Decimal) -> String {
    let base = existing
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or(Decimal::ZERO);
    (base + add).to_string()
}

/// Floor the accumulated commission into payable currency units
pub fn floored_payout(stored: Option<&str>) -> i64 {
    stored
        .and_then(|s| Decimal::from_str(s).ok())
        .map(|d| d.floor().to_i64().unwrap_or(0))
        .unwrap_or(0)
}

// ── Application ─────────────────────────────────────────────────────

fn check_window(c: &Coupon, now: i64) -> AppResult<()> {
    let started = c.starts_at.is_none_or(|s| s <= now);
    let not_ended = c.ends_at.is_none_or(|e| e >= now);
    if started && not_ended {
        Ok(())
    } else {
        Err(AppError::not_found("Coupon is Expired", "الكوبون منتهي"))
    }
}

/// Apply a coupon to the user's cart: discount the eligible lines' share of
/// the total, count the use against the per-user limit, and for marketing
/// coupons accrue the exact commission on the cart.
pub async fn apply_to_cart(pool: &SqlitePool, user_id: i64, code: &str) -> AppResult<CartView> {
    let cart_row = cart::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;

    if cart_row.coupon_used {
        return Err(AppError::not_found(
            "A coupon is already applied to this cart",
            "تم تطبيق كوبون على هذه السلة بالفعل",
        ));
    }

    let coupon_row = coupon::find_by_code(pool, code)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon Not Found", "الكوبون غير موجود"))?;

    if coupon_row.kind == CouponKind::Normal {
        check_window(&coupon_row, shared::util::now_millis())?;
    }

    let items = cart::items(pool, cart_row.id).await?;
    let eligible: Vec<_> = items
        .iter()
        .filter(|i| coupon_row.products.contains(&i.product_id))
        .collect();
    let eligible_total: i64 = eligible.iter().map(|i| i.total).sum();
    if eligible_total == 0 {
        return Err(AppError::business_rule(
            "Coupon does not apply to any product in your cart",
            "الكوبون لا ينطبق على أي منتج في سلتك",
        ));
    }

    let commission = match coupon_row.kind {
        CouponKind::Normal => {
            let counted = coupon::try_increment_usage(
                pool,
                coupon_row.id,
                user_id,
                coupon_row.usage_limit,
            )
            .await?;
            if !counted {
                return Err(AppError::business_rule(
                    "You Used This Coupon All Times",
                    "لقد استخدمت هذا الكوبون كل مراته",
                ));
            }
            None
        }
        CouponKind::Marketing => {
            let exact = commission_exact(
                eligible_total,
                coupon_row.commission_percent.unwrap_or(0),
            );
            Some(accumulate_commission(
                cart_row.coupon_commission.as_deref(),
                exact,
            ))
        }
    };

    // The discount lands on each eligible line so the channel split and
    // order snapshot see discounted totals.
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let mut total_discount = 0;
    for item in &eligible {
        let off = discount_amount(item.total, coupon_row.discount);
        cart::set_item_total(&mut *tx, item.id, item.total - off).await?;
        total_discount += off;
    }
    cart::apply_coupon(
        &mut *tx,
        cart_row.id,
        coupon_row.id,
        cart_row.total_price - total_discount,
        commission.as_deref(),
    )
    .await?;
    tx.commit().await.map_err(AppError::from)?;

    carts::view(pool, user_id).await
}

/// What the pre-check endpoint returns
#[derive(Debug, serde::Serialize)]
pub struct CouponPreview {
    pub discount: i64,
    pub products: Vec<i64>,
}

/// Validity pre-check: exists, inside its window, and this user still has
/// uses left. Does not count a use.
pub async fn precheck(pool: &SqlitePool, user_id: i64, code: &str) -> AppResult<CouponPreview> {
    let coupon_row = coupon::find_by_code(pool, code)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon Not Found", "الكوبون غير موجود"))?;

    if coupon_row.kind == CouponKind::Normal {
        check_window(&coupon_row, shared::util::now_millis())?;
        let used = coupon::usage_for(pool, coupon_row.id, user_id).await?;
        if used >= coupon_row.usage_limit {
            return Err(AppError::business_rule(
                "You Used This Coupon All Times",
                "لقد استخدمت هذا الكوبون كل مراته",
            ));
        }
    }

    Ok(CouponPreview {
        discount: coupon_row.discount,
        products: coupon_row.products.0.clone(),
    })
}

// ── Admin CRUD ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CouponCreate {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    pub kind: CouponKind,
    #[validate(range(min = 1, max = 99))]
    pub discount: i64,
    #[validate(range(min = 1))]
    #[serde(default = "default_usage_limit")]
    pub usage_limit: i64,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub marketer_id: Option<i64>,
    #[validate(range(min = 1, max = 99))]
    pub commission_percent: Option<i64>,
    pub department: DepartmentSelector,
}

fn default_usage_limit() -> i64 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CouponUpdate {
    #[validate(range(min = 1, max = 99))]
    pub discount: Option<i64>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub department: Option<DepartmentSelector>,
}

pub async fn create(pool: &SqlitePool, data: CouponCreate) -> AppResult<Coupon> {
    data.validate()?;
    if data.kind == CouponKind::Marketing
        && (data.marketer_id.is_none() || data.commission_percent.is_none())
    {
        return Err(AppError::validation(
            "Marketing coupons need a marketer and a commission percent",
            "كوبونات التسويق تتطلب مسوقًا ونسبة عمولة",
        ));
    }
    let products = resolve_selector(pool, &data.department).await?;
    let created = coupon::create(
        pool,
        &data.code,
        data.kind,
        data.discount,
        data.usage_limit,
        data.starts_at,
        data.ends_at,
        data.marketer_id,
        data.commission_percent,
        &products,
    )
    .await?;
    Ok(created)
}

pub async fn update(pool: &SqlitePool, id: i64, data: CouponUpdate) -> AppResult<Coupon> {
    data.validate()?;
    let products = match &data.department {
        Some(selector) => Some(resolve_selector(pool, selector).await?),
        None => None,
    };
    let updated = coupon::update(
        pool,
        id,
        data.discount,
        data.usage_limit,
        data.starts_at,
        data.ends_at,
        products.as_deref(),
    )
    .await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_floors_toward_zero() {
        assert_eq!(discount_amount(999, 10), 99);
        assert_eq!(discount_amount(100, 33), 33);
        assert_eq!(discount_amount(0, 50), 0);
    }

    #[test]
    fn commission_stays_exact_until_payout() {
        let first = commission_exact(999, 10); // 99.9
        let stored = accumulate_commission(None, first);
        assert_eq!(stored, "99.9");

        let second = commission_exact(15, 10); // 1.5
        let stored = accumulate_commission(Some(&stored), second);
        assert_eq!(stored, "101.4");

        assert_eq!(floored_payout(Some(&stored)), 101);
    }

    #[test]
    fn payout_of_missing_commission_is_zero() {
        assert_eq!(floored_payout(None), 0);
        assert_eq!(floored_payout(Some("garbage")), 0);
    }

    #[test]
    fn selector_parses_original_wire_shape() {
        let s: DepartmentSelector =
            serde_json::from_str(r#"{"key":"allProducts"}"#).unwrap();
        assert!(matches!(s, DepartmentSelector::AllProducts));

        let s: DepartmentSelector =
            serde_json::from_str(r#"{"key":"products","value":[1,2]}"#).unwrap();
        assert!(matches!(s, DepartmentSelector::Products(v) if v == vec![1, 2]));

        let s: DepartmentSelector =
            serde_json::from_str(r#"{"key":"subcategories","value":[7]}"#).unwrap();
        assert!(matches!(s, DepartmentSelector::SubCategories(v) if v == vec![7]));
    }
}
