//! Cart line pricing
//!
//! One place computes what a cart line costs; everything downstream
//! (channel split, coupons, order snapshots) works from these totals.

use shared::models::{ChosenProperty, Product};

/// Price a cart line:
/// `(unit price + per-unit shipping + variant surcharges) * quantity`.
///
/// The unit price is the discounted price when one is set. Variant matching
/// is permissive: a chosen property that matches no variant group, or a
/// value missing from its group, simply adds nothing.
pub fn line_total(product: &Product, quantity: i64, properties: &[ChosenProperty]) -> i64 {
    let extras: i64 = properties
        .iter()
        .map(|p| variant_surcharge(product, p))
        .sum();
    (product.unit_price() + product.shipping_price + extras) * quantity
}

fn variant_surcharge(product: &Product, chosen: &ChosenProperty) -> i64 {
    product
        .qualities
        .iter()
        .find(|q| q.key == chosen.key)
        .and_then(|q| q.values.iter().find(|v| v.value == chosen.value))
        .map(|v| v.price)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PaymentKind, Quality, QualityValue};
    use sqlx::types::Json;

    fn product(price_before: i64, price_after: Option<i64>, shipping: i64) -> Product {
        Product {
            id: 1,
            title_en: "Shirt".into(),
            title_ar: "قميص".into(),
            price_before_discount: price_before,
            price_after_discount: price_after,
            shipping_price: shipping,
            quantity: 100,
            repo_quantity: 0,
            sales: 0,
            payment_kind: PaymentKind::Both,
            category_id: None,
            sub_category_id: None,
            brand_id: None,
            qualities: Json(vec![Quality {
                key: "size".into(),
                values: vec![
                    QualityValue {
                        value: "M".into(),
                        price: 0,
                    },
                    QualityValue {
                        value: "XL".into(),
                        price: 15,
                    },
                ],
            }]),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn prop(key: &str, value: &str) -> ChosenProperty {
        ChosenProperty {
            key: key.into(),
            value: value.into(),
        }
    }

    #[test]
    fn base_price_times_quantity() {
        let p = product(100, None, 10);
        assert_eq!(line_total(&p, 3, &[]), 330);
    }

    #[test]
    fn discounted_price_wins_when_set() {
        let p = product(100, Some(80), 10);
        assert_eq!(line_total(&p, 2, &[]), 180);
    }

    #[test]
    fn variant_surcharge_multiplies_by_quantity() {
        let p = product(100, None, 0);
        assert_eq!(line_total(&p, 2, &[prop("size", "XL")]), 230);
    }

    #[test]
    fn unmatched_property_adds_nothing() {
        let p = product(100, None, 0);
        // unknown key
        assert_eq!(line_total(&p, 1, &[prop("color", "red")]), 100);
        // known key, unknown value
        assert_eq!(line_total(&p, 1, &[prop("size", "XXXL")]), 100);
    }

    #[test]
    fn zero_priced_variant_adds_nothing() {
        let p = product(100, None, 0);
        assert_eq!(line_total(&p, 1, &[prop("size", "M")]), 100);
    }

    #[test]
    fn multiple_properties_sum() {
        let mut p = product(100, None, 5);
        p.qualities.0.push(Quality {
            key: "fabric".into(),
            values: vec![QualityValue {
                value: "silk".into(),
                price: 20,
            }],
        });
        assert_eq!(
            line_total(&p, 2, &[prop("size", "XL"), prop("fabric", "silk")]),
            280
        );
    }
}
