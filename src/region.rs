use crate::comparison::KpiComparison;
use crate::kpi::KpiSummary;
use crate::schema::Record;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regions the business operates in. Rows carrying any other region name are
/// dropped from the breakdown, and the output table preserves this ordering.
pub const VALID_REGIONS: [&str; 11] = [
    "New South Wales",
    "Victoria",
    "Queensland",
    "South Australia",
    "Western Australia",
    "Tasmania",
    "Northern Territory",
    "Australian Capital Territory",
    "Auckland",
    "Wellington",
    "Canterbury",
];

/// One row of the region breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionRow {
    pub region: String,
    pub current: KpiSummary,
    /// Present only when a comparison period is active and this region has
    /// rows in the comparison subset.
    pub comparison: Option<KpiComparison>,
}

fn group_by_region<'a>(records: &[&'a Record]) -> BTreeMap<&'a str, Vec<&'a Record>> {
    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.region.as_str()).or_default().push(record);
    }
    groups
}

/// Groups the filtered main-period subset by region and computes a full KPI
/// summary per region, restricted to [`VALID_REGIONS`] in allow-list order.
///
/// When `compare` holds a non-empty subset, each region's summary is joined
/// with its comparison-period summary; a region with no comparison rows keeps
/// `comparison: None` rather than being compared against a zero baseline.
pub fn region_breakdown(main: &[&Record], compare: Option<&[&Record]>) -> Vec<RegionRow> {
    let main_groups = group_by_region(main);
    let compare_groups = compare
        .filter(|rows| !rows.is_empty())
        .map(group_by_region);

    VALID_REGIONS
        .iter()
        .filter_map(|&region| {
            let rows = main_groups.get(region)?;
            let current = KpiSummary::from_records(rows.iter().copied());

            let comparison = compare_groups.as_ref().and_then(|groups| {
                let compare_rows = groups.get(region)?;
                let baseline = KpiSummary::from_records(compare_rows.iter().copied());
                Some(KpiComparison::new(&current, &baseline))
            });

            Some(RegionRow {
                region: region.to_string(),
                current,
                comparison,
            })
        })
        .collect()
}
