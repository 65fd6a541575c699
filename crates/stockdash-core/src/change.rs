//! Day-over-day change indicator.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// Direction of the day-over-day move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    fn from_delta(delta: Decimal) -> Self {
        if delta > Decimal::ZERO {
            Self::Up
        } else if delta < Decimal::ZERO {
            Self::Down
        } else {
            Self::Flat
        }
    }

    /// Arrow marker shown next to the price.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "▬",
        }
    }

    /// Display color name.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => "green",
            Self::Down => "red",
            Self::Flat => "gray",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Change between the latest close and the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeIndicator {
    /// close - previous_close (unrounded).
    pub delta: Decimal,
    /// delta / previous_close * 100 (unrounded).
    pub percent: Decimal,
    pub direction: Direction,
}

impl ChangeIndicator {
    /// Compute the indicator.
    ///
    /// Returns `None` when there is no previous close, when it is zero
    /// (percent change is undefined), or when the change overflows `Decimal`.
    pub fn compute(close: Decimal, previous_close: Option<Decimal>) -> Option<Self> {
        let previous = previous_close?;
        let delta = close.checked_sub(previous)?;
        let percent = delta
            .checked_div(previous)?
            .checked_mul(Decimal::ONE_HUNDRED)?;

        Some(Self {
            delta,
            percent,
            direction: Direction::from_delta(delta),
        })
    }

    /// Delta rounded to two decimals, e.g. "1.50" or "-0.25".
    pub fn delta_text(&self) -> String {
        format_2dp(self.delta)
    }

    /// Percent rounded to two decimals with a trailing '%', e.g. "15.79%".
    pub fn percent_text(&self) -> String {
        format!("{}%", format_2dp(self.percent))
    }
}

impl fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.direction.marker(),
            self.delta_text(),
            self.percent_text()
        )
    }
}

fn format_2dp(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    // Avoid "-0.00" for tiny negative moves
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_upward_change() {
        let change = ChangeIndicator::compute(dec!(11), Some(dec!(9.5))).unwrap();
        assert_eq!(change.delta, dec!(1.5));
        assert_eq!(change.delta_text(), "1.50");
        assert_eq!(change.percent_text(), "15.79%");
        assert_eq!(change.direction, Direction::Up);
        assert_eq!(change.direction.marker(), "▲");
        assert_eq!(change.direction.color(), "green");
    }

    #[test]
    fn test_downward_change() {
        let change = ChangeIndicator::compute(dec!(9), Some(dec!(10))).unwrap();
        assert_eq!(change.delta_text(), "-1.00");
        assert_eq!(change.percent_text(), "-10.00%");
        assert_eq!(change.direction, Direction::Down);
        assert_eq!(change.direction.color(), "red");
    }

    #[test]
    fn test_flat_change() {
        let change = ChangeIndicator::compute(dec!(10), Some(dec!(10))).unwrap();
        assert_eq!(change.delta_text(), "0.00");
        assert_eq!(change.percent_text(), "0.00%");
        assert_eq!(change.direction, Direction::Flat);
        assert_eq!(change.direction.marker(), "▬");
    }

    #[test]
    fn test_no_previous_close() {
        assert!(ChangeIndicator::compute(dec!(10), None).is_none());
        assert!(ChangeIndicator::compute(dec!(10), Some(Decimal::ZERO)).is_none());
    }

    #[test]
    fn test_out_of_range_change_is_none() {
        // Delta fits, percent overflows
        let huge = Decimal::from_str("1000000000000000000000000000").unwrap();
        assert!(ChangeIndicator::compute(huge, Some(Decimal::ONE)).is_none());
        // Delta itself overflows
        assert!(ChangeIndicator::compute(Decimal::MAX, Some(Decimal::MIN)).is_none());
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_2dp(dec!(0.125)), "0.13");
        assert_eq!(format_2dp(dec!(-0.125)), "-0.13");
        assert_eq!(format_2dp(dec!(-0.001)), "0.00");
    }

    #[test]
    fn test_display() {
        let change = ChangeIndicator::compute(dec!(11), Some(dec!(9.5))).unwrap();
        assert_eq!(change.to_string(), "▲ 1.50 (15.79%)");
    }
}
