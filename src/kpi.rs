use crate::schema::Record;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ratio with the uniform zero-denominator policy: a denominator that sums to
/// zero yields exactly 0.0, regardless of the numerator. Never NaN, never
/// infinity.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Headline totals for a record subset: spend, attributed bookings, and cost
/// per booking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    pub cost: f64,
    /// Sum of GA-attributed bookings, not channel-reported bookings.
    pub bookings: f64,
    pub cost_per_booking: f64,
}

impl Totals {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut cost = 0.0;
        let mut bookings = 0.0;

        for record in records {
            cost += record.cost;
            bookings += record.ga_bookings;
        }

        Self {
            cost,
            bookings,
            cost_per_booking: ratio(cost, bookings),
        }
    }
}

/// Full KPI summary for a record subset, used per-region and wherever the
/// derived ratio metrics are displayed alongside the raw sums.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct KpiSummary {
    pub impressions: f64,
    pub clicks: f64,
    pub cost: f64,
    pub leads: f64,
    pub bookings: f64,
    /// Click-through rate: clicks / impressions.
    pub ctr: f64,
    /// Cost per click.
    pub cpc: f64,
    pub cost_per_booking: f64,
    /// Conversion rate: leads / clicks.
    pub conversion_rate: f64,
}

impl KpiSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut impressions = 0.0;
        let mut clicks = 0.0;
        let mut cost = 0.0;
        let mut leads = 0.0;
        let mut bookings = 0.0;

        for record in records {
            impressions += record.impressions;
            clicks += record.clicks;
            cost += record.cost;
            leads += record.channel_leads;
            bookings += record.ga_bookings;
        }

        Self {
            impressions,
            clicks,
            cost,
            leads,
            bookings,
            ctr: ratio(clicks, impressions),
            cpc: ratio(cost, clicks),
            cost_per_booking: ratio(cost, bookings),
            conversion_rate: ratio(leads, clicks),
        }
    }
}
