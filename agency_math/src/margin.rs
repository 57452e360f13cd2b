//! Project margin formula
//!
//! Margin is revenue minus personnel cost minus non-personnel cost. Inputs are
//! taken as-is: negative values propagate through the arithmetic.

use serde::{Deserialize, Serialize};

/// Revenue, cost and margin figures for one project or a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginBreakdown {
    pub revenue: f64,
    pub personnel_cost: f64,
    pub non_personnel_cost: f64,
    pub total_cost: f64,
    pub margin: f64,
    /// Margin as a percentage of revenue, 0 when revenue is not positive
    pub margin_pct: f64,
}

/// Margin as a percentage of revenue.
///
/// Returns exactly `0.0` when `revenue <= 0`.
pub fn margin_pct(margin: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        margin / revenue * 100.0
    } else {
        0.0
    }
}

/// Compute the margin breakdown for the given revenue and costs
pub fn compute_margin(revenue: f64, personnel_cost: f64, non_personnel_cost: f64) -> MarginBreakdown {
    let total_cost = personnel_cost + non_personnel_cost;
    let margin = revenue - total_cost;

    MarginBreakdown {
        revenue,
        personnel_cost,
        non_personnel_cost,
        total_cost,
        margin,
        margin_pct: margin_pct(margin, revenue),
    }
}

impl MarginBreakdown {
    /// Sum several breakdowns, recomputing the percentage on the totals
    pub fn total<'a, I>(breakdowns: I) -> Self
    where
        I: IntoIterator<Item = &'a MarginBreakdown>,
    {
        let (revenue, personnel, non_personnel) = breakdowns.into_iter().fold(
            (0.0, 0.0, 0.0),
            |(rev, pers, non_pers), b| {
                (rev + b.revenue, pers + b.personnel_cost, non_pers + b.non_personnel_cost)
            },
        );
        compute_margin(revenue, personnel, non_personnel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compute_margin() {
        let m = compute_margin(45000.0, 12000.0, 6700.0);
        assert_relative_eq!(m.total_cost, 18700.0);
        assert_relative_eq!(m.margin, 26300.0);
        assert_relative_eq!(m.margin_pct, 26300.0 / 45000.0 * 100.0);
    }

    #[test]
    fn test_zero_revenue_gives_zero_pct() {
        let m = compute_margin(0.0, 5000.0, 1000.0);
        assert_eq!(m.margin, -6000.0);
        assert_eq!(m.margin_pct, 0.0);

        assert_eq!(margin_pct(-100.0, -50.0), 0.0);
    }

    #[test]
    fn test_negative_margin() {
        let m = compute_margin(10000.0, 9000.0, 3000.0);
        assert_relative_eq!(m.margin, -2000.0);
        assert_relative_eq!(m.margin_pct, -20.0);
    }

    #[test]
    fn test_total() {
        let a = compute_margin(10000.0, 4000.0, 1000.0);
        let b = compute_margin(0.0, 500.0, 0.0);
        let total = MarginBreakdown::total([a, b].iter());
        assert_relative_eq!(total.revenue, 10000.0);
        assert_relative_eq!(total.total_cost, 5500.0);
        assert_relative_eq!(total.margin_pct, 45.0);

        let empty = MarginBreakdown::total(std::iter::empty());
        assert_eq!(empty, MarginBreakdown::default());
    }
}
