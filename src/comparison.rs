use crate::kpi::{KpiSummary, Totals};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Direction in which a metric improves. Fixed by business meaning, never
/// user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Polarity {
    IncreaseIsFavorable,
    DecreaseIsFavorable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Favorability {
    Favorable,
    Unfavorable,
    Neutral,
}

/// Relative change between a main-period value and its comparison baseline.
///
/// A zero baseline with a non-zero current value reports exactly +1.0 (+100%)
/// rather than infinity; zero on both sides reports exactly 0.0.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous
    } else if current == 0.0 {
        0.0
    } else {
        1.0
    }
}

pub fn classify(percent_change: f64, polarity: Polarity) -> Favorability {
    if percent_change == 0.0 {
        return Favorability::Neutral;
    }

    let improved = match polarity {
        Polarity::IncreaseIsFavorable => percent_change > 0.0,
        Polarity::DecreaseIsFavorable => percent_change < 0.0,
    };

    if improved {
        Favorability::Favorable
    } else {
        Favorability::Unfavorable
    }
}

/// One metric's main-vs-comparison pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDelta {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub percent_change: f64,
    pub favorability: Favorability,
}

impl MetricDelta {
    pub fn new(current: f64, previous: f64, polarity: Polarity) -> Self {
        let pct = percent_change(current, previous);
        Self {
            current,
            previous,
            delta: current - previous,
            percent_change: pct,
            favorability: classify(pct, polarity),
        }
    }
}

/// Main-vs-comparison deltas for the headline totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TotalsComparison {
    pub cost: MetricDelta,
    pub bookings: MetricDelta,
    pub cost_per_booking: MetricDelta,
}

impl TotalsComparison {
    pub fn new(main: &Totals, compare: &Totals) -> Self {
        Self {
            cost: MetricDelta::new(main.cost, compare.cost, Polarity::IncreaseIsFavorable),
            bookings: MetricDelta::new(
                main.bookings,
                compare.bookings,
                Polarity::IncreaseIsFavorable,
            ),
            cost_per_booking: MetricDelta::new(
                main.cost_per_booking,
                compare.cost_per_booking,
                Polarity::DecreaseIsFavorable,
            ),
        }
    }
}

/// Main-vs-comparison deltas for the full KPI summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiComparison {
    pub impressions: MetricDelta,
    pub clicks: MetricDelta,
    pub cost: MetricDelta,
    pub leads: MetricDelta,
    pub bookings: MetricDelta,
    pub ctr: MetricDelta,
    pub cpc: MetricDelta,
    pub cost_per_booking: MetricDelta,
    pub conversion_rate: MetricDelta,
}

impl KpiComparison {
    pub fn new(main: &KpiSummary, compare: &KpiSummary) -> Self {
        use Polarity::{DecreaseIsFavorable, IncreaseIsFavorable};

        Self {
            impressions: MetricDelta::new(main.impressions, compare.impressions, IncreaseIsFavorable),
            clicks: MetricDelta::new(main.clicks, compare.clicks, IncreaseIsFavorable),
            cost: MetricDelta::new(main.cost, compare.cost, IncreaseIsFavorable),
            leads: MetricDelta::new(main.leads, compare.leads, IncreaseIsFavorable),
            bookings: MetricDelta::new(main.bookings, compare.bookings, IncreaseIsFavorable),
            ctr: MetricDelta::new(main.ctr, compare.ctr, IncreaseIsFavorable),
            cpc: MetricDelta::new(main.cpc, compare.cpc, DecreaseIsFavorable),
            cost_per_booking: MetricDelta::new(
                main.cost_per_booking,
                compare.cost_per_booking,
                DecreaseIsFavorable,
            ),
            conversion_rate: MetricDelta::new(
                main.conversion_rate,
                compare.conversion_rate,
                IncreaseIsFavorable,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change_against_positive_baseline() {
        assert!((percent_change(150.0, 100.0) - 0.5).abs() < 1e-9);
        assert!((percent_change(50.0, 100.0) + 0.5).abs() < 1e-9);
        assert_eq!(percent_change(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_percent_change_zero_baseline_sentinel() {
        // Growth from nothing reads as exactly +100%, never infinity.
        assert_eq!(percent_change(42.0, 0.0), 1.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_classification_respects_polarity() {
        assert_eq!(
            classify(0.2, Polarity::IncreaseIsFavorable),
            Favorability::Favorable
        );
        assert_eq!(
            classify(-0.2, Polarity::IncreaseIsFavorable),
            Favorability::Unfavorable
        );
        assert_eq!(
            classify(0.2, Polarity::DecreaseIsFavorable),
            Favorability::Unfavorable
        );
        assert_eq!(
            classify(-0.2, Polarity::DecreaseIsFavorable),
            Favorability::Favorable
        );
        assert_eq!(
            classify(0.0, Polarity::IncreaseIsFavorable),
            Favorability::Neutral
        );
        assert_eq!(
            classify(0.0, Polarity::DecreaseIsFavorable),
            Favorability::Neutral
        );
    }

    #[test]
    fn test_totals_comparison() {
        let main = Totals {
            cost: 200.0,
            bookings: 20.0,
            cost_per_booking: 10.0,
        };
        let compare = Totals {
            cost: 100.0,
            bookings: 25.0,
            cost_per_booking: 4.0,
        };

        let comparison = TotalsComparison::new(&main, &compare);

        assert!((comparison.cost.delta - 100.0).abs() < 1e-9);
        assert!((comparison.cost.percent_change - 1.0).abs() < 1e-9);
        assert_eq!(comparison.cost.favorability, Favorability::Favorable);

        assert!((comparison.bookings.percent_change + 0.2).abs() < 1e-9);
        assert_eq!(comparison.bookings.favorability, Favorability::Unfavorable);

        // Cost per booking rose from 4 to 10, which is the wrong direction.
        assert!((comparison.cost_per_booking.percent_change - 1.5).abs() < 1e-9);
        assert_eq!(
            comparison.cost_per_booking.favorability,
            Favorability::Unfavorable
        );
    }

    #[test]
    fn test_kpi_comparison_cpc_polarity() {
        let mut main = KpiSummary::default();
        let mut compare = KpiSummary::default();
        main.cpc = 1.5;
        compare.cpc = 2.0;

        let comparison = KpiComparison::new(&main, &compare);
        assert_eq!(comparison.cpc.favorability, Favorability::Favorable);
        assert!((comparison.cpc.delta + 0.5).abs() < 1e-9);
    }
}
