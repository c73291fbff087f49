//! Channel split
//!
//! Pure computation dividing cart lines into the online and cash payment
//! channels and allocating a points deduction cash-first.

use serde::Serialize;
use shared::models::{CartItem, PaymentKind};

/// The split cart as shown to the storefront and snapshotted into orders
#[derive(Debug, Serialize)]
pub struct CartSplit {
    pub online_items: Vec<CartItem>,
    pub cash_items: Vec<CartItem>,
    pub online_total: i64,
    pub online_quantity: i64,
    pub cash_total: i64,
    pub cash_quantity: i64,
    /// Amount still due on each channel after the points deduction
    pub online_due: i64,
    pub cash_due: i64,
    /// Derived from channel presence: both channels populated means `both`
    pub transaction_type: PaymentKind,
}

/// Split lines by their product's payment kind: online-capable products
/// (online or both) settle through the gateway, cash-only products are paid
/// on delivery. A points deduction eats the cash side first, the remainder
/// comes off the online side.
pub fn split_channels(items: Vec<(CartItem, PaymentKind)>, points_deduction: i64) -> CartSplit {
    let mut online_items = Vec::new();
    let mut cash_items = Vec::new();
    let (mut online_total, mut online_quantity) = (0, 0);
    let (mut cash_total, mut cash_quantity) = (0, 0);

    for (item, kind) in items {
        if kind.is_online_capable() {
            online_total += item.total;
            online_quantity += item.quantity;
            online_items.push(item);
        } else {
            cash_total += item.total;
            cash_quantity += item.quantity;
            cash_items.push(item);
        }
    }

    let from_cash = points_deduction.min(cash_total);
    let from_online = (points_deduction - from_cash).min(online_total);

    let transaction_type = match (online_items.is_empty(), cash_items.is_empty()) {
        (false, false) => PaymentKind::Both,
        (false, true) => PaymentKind::Online,
        _ => PaymentKind::Cash,
    };

    CartSplit {
        online_due: online_total - from_online,
        cash_due: cash_total - from_cash,
        online_items,
        cash_items,
        online_total,
        online_quantity,
        cash_total,
        cash_quantity,
        transaction_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn item(product_id: i64, quantity: i64, total: i64) -> CartItem {
        CartItem {
            id: product_id * 10,
            cart_id: 1,
            product_id,
            quantity,
            total,
            properties: Json(vec![]),
        }
    }

    #[test]
    fn online_and_both_share_a_channel() {
        let split = split_channels(
            vec![
                (item(1, 1, 100), PaymentKind::Online),
                (item(2, 2, 200), PaymentKind::Both),
                (item(3, 1, 50), PaymentKind::Cash),
            ],
            0,
        );
        assert_eq!(split.online_items.len(), 2);
        assert_eq!(split.online_total, 300);
        assert_eq!(split.online_quantity, 3);
        assert_eq!(split.cash_total, 50);
        assert_eq!(split.transaction_type, PaymentKind::Both);
    }

    #[test]
    fn transaction_type_follows_channel_presence() {
        let online_only = split_channels(vec![(item(1, 1, 100), PaymentKind::Online)], 0);
        assert_eq!(online_only.transaction_type, PaymentKind::Online);

        let cash_only = split_channels(vec![(item(1, 1, 100), PaymentKind::Cash)], 0);
        assert_eq!(cash_only.transaction_type, PaymentKind::Cash);
    }

    #[test]
    fn points_deduction_eats_cash_first() {
        let split = split_channels(
            vec![
                (item(1, 1, 100), PaymentKind::Online),
                (item(2, 1, 60), PaymentKind::Cash),
            ],
            80,
        );
        assert_eq!(split.cash_due, 0);
        assert_eq!(split.online_due, 80);
    }

    #[test]
    fn deduction_within_cash_leaves_online_untouched() {
        let split = split_channels(
            vec![
                (item(1, 1, 100), PaymentKind::Online),
                (item(2, 1, 60), PaymentKind::Cash),
            ],
            40,
        );
        assert_eq!(split.cash_due, 20);
        assert_eq!(split.online_due, 100);
    }

    #[test]
    fn deduction_never_goes_negative() {
        let split = split_channels(vec![(item(1, 1, 50), PaymentKind::Cash)], 500);
        assert_eq!(split.cash_due, 0);
        assert_eq!(split.online_due, 0);
    }
}
