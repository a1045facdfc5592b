//! Rounding rules shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// A whole-yen amount usable in constants.
pub(crate) const fn yen(amount: u32) -> Decimal {
    Decimal::from_parts(amount, 0, 0, false, 0)
}

/// A rate `mantissa × 10^-scale` usable in constants.
pub(crate) const fn rate(mantissa: u32, scale: u32) -> Decimal {
    Decimal::from_parts(mantissa, 0, 0, false, scale)
}

/// Floors an amount to a multiple of `unit`.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::floor_to_unit;
/// use rust_decimal::Decimal;
///
/// assert_eq!(floor_to_unit(Decimal::from(2_158_524), Decimal::from(1000)), Decimal::from(2_158_000));
/// ```
pub fn floor_to_unit(amount: Decimal, unit: Decimal) -> Decimal {
    (amount / unit).floor() * unit
}

/// Floors an amount to whole yen.
pub fn floor_yen(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Rounds a premium to whole yen, with exact halves rounding up.
///
/// Applied to each monthly premium and to each bonus premium
/// independently.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::round_social_insurance_premium;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let premium = Decimal::from_str("20315.5").unwrap();
/// assert_eq!(round_social_insurance_premium(premium), Decimal::from(20316));
/// ```
pub fn round_social_insurance_premium(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
