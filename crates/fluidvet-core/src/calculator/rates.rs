//! Rate derivations. No rounding happens here; presentation rounds.

use crate::models::{DropFactor, RateSet};

/// Derive every infusion rate from a volume per hour.
///
/// `seconds_per_drop` is `None` when there is no flow.
pub fn derive_rates(ml_per_hr: f64, weight_kg: f64, drop_factor: DropFactor) -> RateSet {
    let ml_per_min = ml_per_hr / 60.0;
    let ml_per_kg_per_hr = ml_per_hr / weight_kg;
    let ml_per_kg_per_day = ml_per_kg_per_hr * 24.0;
    let drops_per_min = ml_per_min * f64::from(drop_factor.drops_per_ml());
    let drops_per_sec = drops_per_min / 60.0;
    let seconds_per_drop = if drops_per_sec > 0.0 {
        Some(1.0 / drops_per_sec)
    } else {
        None
    };

    RateSet {
        ml_per_hr,
        ml_per_min,
        ml_per_kg_per_hr,
        ml_per_kg_per_day,
        drops_per_min,
        seconds_per_drop,
    }
}
