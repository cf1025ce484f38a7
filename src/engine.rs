use crate::comparison::TotalsComparison;
use crate::error::{EngineError, Result};
use crate::kpi::Totals;
use crate::region::region_breakdown;
use crate::schema::{FacetChoice, FilterSelection, Period, Record, ReportRequest};
use crate::utils::{start_of_month, start_of_week, start_of_year};
use crate::{PerformanceReport, PeriodSection, RelativeWindows};
use chrono::NaiveDate;
use log::debug;

/// Distinct campaign names observed under the given channel selection,
/// sorted. `FacetChoice::All` yields the full campaign universe.
///
/// Callers presenting campaign choices must re-invoke this whenever the
/// channel selection changes; the returned list is only valid for the channel
/// it was computed against.
pub fn campaign_options(records: &[Record], channel: &FacetChoice) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .filter(|record| channel.matches(&record.channel))
        .map(|record| record.campaign.clone())
        .collect();

    names.sort();
    names.dedup();
    names
}

/// One full recomputation pass over an immutable record snapshot.
///
/// The engine borrows the snapshot and holds no other state; every
/// [`build`](Self::build) call recomputes from scratch.
pub struct ReportEngine<'a> {
    records: &'a [Record],
}

impl<'a> ReportEngine<'a> {
    pub fn new(records: &'a [Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(EngineError::NoData);
        }
        Ok(Self { records })
    }

    pub fn campaign_options(&self, channel: &FacetChoice) -> Vec<String> {
        campaign_options(self.records, channel)
    }

    fn facet_subset(&self, filter: &FilterSelection) -> Vec<&'a Record> {
        self.records
            .iter()
            .filter(|record| filter.matches(record))
            .collect()
    }

    fn period_subset(subset: &[&'a Record], period: &Period) -> Vec<&'a Record> {
        subset
            .iter()
            .copied()
            .filter(|record| period.contains(record.date))
            .collect()
    }

    /// Relative windows filter on the lower bound only; rows dated after
    /// `today` remain in scope.
    fn window_totals(subset: &[&'a Record], start: NaiveDate) -> Totals {
        Totals::from_records(subset.iter().copied().filter(|record| record.date >= start))
    }

    pub fn build(&self, request: &ReportRequest) -> Result<PerformanceReport> {
        let subset = self.facet_subset(&request.filter);
        debug!(
            "{} of {} records match the facet selection",
            subset.len(),
            self.records.len()
        );

        let windows = RelativeWindows {
            week_to_date: Self::window_totals(&subset, start_of_week(request.today)),
            month_to_date: Self::window_totals(&subset, start_of_month(request.today)),
            year_to_date: Self::window_totals(&subset, start_of_year(request.today)),
        };

        let (main, regions) = match &request.main_period {
            None => {
                debug!("no complete main period selected; period sections suppressed");
                (None, Vec::new())
            }
            Some(period) => {
                let main_rows = Self::period_subset(&subset, period);
                let totals = Totals::from_records(main_rows.iter().copied());

                let compare_rows = request
                    .comparison_period
                    .as_ref()
                    .map(|compare| Self::period_subset(&subset, compare));

                let comparison = compare_rows.as_ref().map(|rows| {
                    let baseline = Totals::from_records(rows.iter().copied());
                    TotalsComparison::new(&totals, &baseline)
                });

                let regions = region_breakdown(&main_rows, compare_rows.as_deref());
                (Some(PeriodSection { totals, comparison }), regions)
            }
        };

        Ok(PerformanceReport {
            main,
            windows,
            regions,
        })
    }
}
