//! Shared helpers for the calculation stages: financial rounding and
//! decimal comparison.

use rust_decimal::Decimal;

/// Rounds a DKK amount to øre (two decimal places) using half-up rounding.
///
/// Values at exactly 0.005 round away from zero. Every named component of a
/// breakdown is rounded through this function as it is produced, so itemized
/// lines always sum exactly into the reported totals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use netto_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a DKK amount to whole kroner, half-up.
///
/// Used only at the presentation boundary (chart points); intermediate
/// bases are never reduced to whole kroner.
pub fn round_kroner(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(19.994)), dec!(19.99));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(19.995)), dec!(20.00));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-19.995)), dec!(-20.00));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(39019.54)), dec!(39019.54));
    }

    // =========================================================================
    // round_kroner tests
    // =========================================================================

    #[test]
    fn round_kroner_drops_oere() {
        assert_eq!(round_kroner(dec!(26705.49)), dec!(26705));
    }

    #[test]
    fn round_kroner_rounds_half_up() {
        assert_eq!(round_kroner(dec!(26705.50)), dec!(26706));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
    }

    #[test]
    fn max_clamps_negative_against_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }
}
