//! Points conversion math
//!
//! Pure functions; the engine wires them to storage. All divisions floor
//! toward zero, matching integer currency semantics.

use shared::models::PointsConfig;

/// Points one redemption consumes: everything the user holds, capped by
/// the configured maximum. Callers gate on `min_points` before asking.
pub fn usable_points(user_points: i64, cfg: &PointsConfig) -> i64 {
    user_points.min(cfg.max_points)
}

/// Currency value of a point amount, floored
pub fn conversion_value(points: i64, cfg: &PointsConfig) -> i64 {
    if cfg.points_per_currency_unit <= 0 {
        return 0;
    }
    points / cfg.points_per_currency_unit
}

/// Deduction actually applied to the cart. A value above the cart total is
/// refused (`None`); one covering it exactly is cut to 80%, floored, so an
/// order is never fully free.
pub fn clamp_deduction(value: i64, cart_total: i64) -> Option<i64> {
    if value > cart_total {
        None
    } else if value == cart_total {
        Some(cart_total * 4 / 5)
    } else {
        Some(value)
    }
}

/// Points earned by paying `paid_total` currency units
pub fn earned_points(paid_total: i64, cfg: &PointsConfig) -> i64 {
    cfg.points_per_unit * paid_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PointsMode;

    fn cfg(per_unit: i64, per_currency: i64, min: i64, max: i64) -> PointsConfig {
        PointsConfig {
            id: 1,
            points_per_unit: per_unit,
            points_per_currency_unit: per_currency,
            min_points: min,
            max_points: max,
            mode: PointsMode::Dynamic,
        }
    }

    #[test]
    fn conversion_floors() {
        let c = cfg(0, 7, 0, 1000);
        assert_eq!(conversion_value(50, &c), 7);
        assert_eq!(conversion_value(6, &c), 0);
    }

    #[test]
    fn conversion_survives_zero_rate() {
        let c = cfg(0, 0, 0, 1000);
        assert_eq!(conversion_value(50, &c), 0);
    }

    #[test]
    fn usable_is_capped_by_max() {
        let c = cfg(0, 1, 0, 300);
        assert_eq!(usable_points(500, &c), 300);
        assert_eq!(usable_points(200, &c), 200);
    }

    #[test]
    fn exact_cover_is_cut_to_eighty_percent() {
        assert_eq!(clamp_deduction(100, 100), Some(80));
        // floor on odd totals
        assert_eq!(clamp_deduction(99, 99), Some(79));
    }

    #[test]
    fn value_above_the_cart_is_refused() {
        assert_eq!(clamp_deduction(120, 100), None);
        assert_eq!(clamp_deduction(500, 100), None);
    }

    #[test]
    fn partial_cover_is_untouched() {
        assert_eq!(clamp_deduction(60, 100), Some(60));
    }

    #[test]
    fn earned_scales_with_paid_total() {
        let c = cfg(2, 1, 0, 0);
        assert_eq!(earned_points(150, &c), 300);
        assert_eq!(earned_points(0, &c), 0);
    }

}
