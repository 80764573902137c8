use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount for `InstdAmt`: exactly two decimals, `.` as separator,
/// no currency symbol or digit grouping.
///
/// Rounds half-up (midpoint away from zero), so `12.005` becomes `12.01`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
