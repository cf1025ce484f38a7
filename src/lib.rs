//! # Marketing KPI Engine
//!
//! A library for aggregating marketing performance records (impressions,
//! clicks, cost, leads, bookings) into comparative KPI reports over
//! calendar-relative and custom periods.
//!
//! ## Core Concepts
//!
//! - **Record**: one normalized row of marketing activity from either feed,
//!   keyed by date, channel, campaign, account, offer type, and region
//! - **Filter Selection**: independent facet predicates combined
//!   conjunctively, with campaign options cascading from the channel choice
//! - **Periods**: a user-chosen closed main range, an optional comparison
//!   range, and three fixed relative windows (week/month/year-to-date)
//!   anchored to "today"
//! - **KPI Aggregates**: exact sums plus derived ratios (CTR, CPC, cost per
//!   booking, conversion rate) with a uniform zero-denominator-yields-zero
//!   policy
//! - **Comparison**: per-metric absolute and relative deltas classified as
//!   favorable or unfavorable by each metric's fixed polarity
//!
//! ## Example
//!
//! ```rust,ignore
//! use marketing_kpi_engine::*;
//! use chrono::NaiveDate;
//!
//! let file_feed = load_csv_feed("raw_data.csv").unwrap_or_default();
//! let api_feed = RawTable::new(); // rows fetched by the spreadsheet collaborator
//! let records = normalize_feeds(&file_feed, &api_feed)?;
//!
//! let request = ReportRequest {
//!     filter: FilterSelection {
//!         channel: FacetChoice::Only("Google".to_string()),
//!         ..Default::default()
//!     },
//!     main_period: Some(Period::new(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     )?),
//!     comparison_period: Some(Period::new(
//!         NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
//!     )?),
//!     today: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
//! };
//!
//! let report = build_report(&records, &request)?;
//! ```

pub mod comparison;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod kpi;
pub mod region;
pub mod schema;
pub mod utils;

pub use comparison::{
    classify, percent_change, Favorability, KpiComparison, MetricDelta, Polarity, TotalsComparison,
};
pub use engine::{campaign_options, ReportEngine};
pub use error::{EngineError, Result};
pub use ingestion::*;
pub use kpi::{KpiSummary, Totals};
pub use region::{region_breakdown, RegionRow, VALID_REGIONS};
pub use schema::*;
pub use utils::*;

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Headline totals for the three fixed relative windows. Always produced,
/// even while no main period is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelativeWindows {
    pub week_to_date: Totals,
    pub month_to_date: Totals,
    pub year_to_date: Totals,
}

/// Aggregates for the user-selected main period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodSection {
    pub totals: Totals,
    /// Present only when a comparison period is active.
    pub comparison: Option<TotalsComparison>,
}

/// The complete engine output, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceReport {
    /// `None` while the user has not selected a complete main range.
    pub main: Option<PeriodSection>,
    pub windows: RelativeWindows,
    /// Per-region breakdown of the main period, in allow-list order. Empty
    /// while no main period is selected.
    pub regions: Vec<RegionRow>,
}

impl PerformanceReport {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PerformanceReport)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

pub struct ReportProcessor;

impl ReportProcessor {
    pub fn process(records: &[Record], request: &ReportRequest) -> Result<PerformanceReport> {
        info!("building performance report over {} records", records.len());
        debug!(
            "filter: {:?}, main period: {:?}, comparison period: {:?}",
            request.filter, request.main_period, request.comparison_period
        );

        if request.main_period.is_none() && request.comparison_period.is_some() {
            debug!("comparison period supplied without a main period; it has nothing to compare against");
        }

        let engine = ReportEngine::new(records)?;
        engine.build(request)
    }
}

pub fn build_report(records: &[Record], request: &ReportRequest) -> Result<PerformanceReport> {
    ReportProcessor::process(records, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn victoria_record() -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            channel: "Google".to_string(),
            campaign: "Brand AU".to_string(),
            account: "Main".to_string(),
            offer_type: "Consult".to_string(),
            region: "Victoria".to_string(),
            impressions: 1000.0,
            clicks: 50.0,
            cost: 100.0,
            channel_leads: 5.0,
            channel_bookings: 0.0,
            ga_bookings: 10.0,
            year: 2024,
        }
    }

    fn request_for_january() -> ReportRequest {
        ReportRequest {
            filter: FilterSelection::default(),
            main_period: Some(
                Period::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                )
                .unwrap(),
            ),
            comparison_period: None,
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_end_to_end_single_record() {
        let records = vec![victoria_record()];
        let report = build_report(&records, &request_for_january()).unwrap();

        let main = report.main.unwrap();
        assert!((main.totals.cost - 100.0).abs() < 1e-9);
        assert!((main.totals.bookings - 10.0).abs() < 1e-9);
        assert!((main.totals.cost_per_booking - 10.0).abs() < 1e-9);

        assert_eq!(report.regions.len(), 1);
        let victoria = &report.regions[0];
        assert_eq!(victoria.region, "Victoria");
        assert!((victoria.current.ctr - 0.05).abs() < 1e-9);
        assert!((victoria.current.cpc - 2.0).abs() < 1e-9);
        assert!((victoria.current.cost_per_booking - 10.0).abs() < 1e-9);
        assert!((victoria.current.conversion_rate - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_end_to_end_zero_baseline_comparison() {
        let records = vec![victoria_record()];
        let mut request = request_for_january();
        // A comparison window with no matching rows at all.
        request.comparison_period = Some(
            Period::new(
                NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            )
            .unwrap(),
        );

        let report = build_report(&records, &request).unwrap();
        let comparison = report.main.unwrap().comparison.unwrap();

        // Cost grew from a zero baseline: the +100% sentinel, not infinity.
        assert_eq!(comparison.cost.percent_change, 1.0);
        assert_eq!(comparison.cost.favorability, Favorability::Favorable);
        // Bookings also grew from zero.
        assert_eq!(comparison.bookings.percent_change, 1.0);
    }

    #[test]
    fn test_empty_record_set_is_fatal() {
        let records: Vec<Record> = Vec::new();
        let result = build_report(&records, &request_for_january());
        assert!(matches!(result, Err(EngineError::NoData)));
    }

    #[test]
    fn test_report_schema_generation() {
        let schema_json = PerformanceReport::schema_as_json().unwrap();
        assert!(schema_json.contains("windows"));
        assert!(schema_json.contains("regions"));
    }
}
