use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One normalized row of marketing activity.
///
/// Rows are keyed implicitly by (date, channel, campaign, account, offer type,
/// region). Numeric measures are always finite: anything the feeds could not
/// supply is coerced to zero during ingestion, never left null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    pub date: NaiveDate,
    pub channel: String,
    pub campaign: String,
    pub account: String,
    pub offer_type: String,
    pub region: String,
    pub impressions: f64,
    pub clicks: f64,
    pub cost: f64,
    /// Leads reported by the channel itself.
    pub channel_leads: f64,
    /// Bookings reported by the channel itself. Carried through from the
    /// feeds; booking KPIs read `ga_bookings` instead.
    pub channel_bookings: f64,
    /// Bookings attributed via the secondary analytics feed.
    pub ga_bookings: f64,
    pub year: i32,
}

/// A single-facet selection: either everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum FacetChoice {
    #[schemars(description = "Match every value of this facet")]
    All,

    #[schemars(description = "Match only records whose facet equals this value exactly")]
    Only(String),
}

impl Default for FacetChoice {
    fn default() -> Self {
        Self::All
    }
}

impl FacetChoice {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

/// The user's facet selections, combined conjunctively.
///
/// An empty `campaigns` set matches every campaign. Campaign options offered
/// to a caller must be restricted to campaigns observed under the currently
/// selected channel; see [`crate::engine::campaign_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterSelection {
    #[serde(default)]
    pub channel: FacetChoice,

    #[serde(default)]
    #[schemars(description = "Campaign names to include. Empty means all campaigns.")]
    pub campaigns: BTreeSet<String>,

    #[serde(default)]
    pub account: FacetChoice,

    #[serde(default)]
    pub offer_type: FacetChoice,
}

impl FilterSelection {
    /// The combined inclusion predicate. Facets are independent, so the
    /// conjunction is order-insensitive.
    pub fn matches(&self, record: &Record) -> bool {
        self.channel.matches(&record.channel)
            && (self.campaigns.is_empty() || self.campaigns.contains(&record.campaign))
            && self.account.matches(&record.account)
            && self.offer_type.matches(&record.offer_type)
    }
}

/// A closed calendar interval, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(EngineError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One report invocation: which records to include and which periods to
/// aggregate over.
///
/// `main_period: None` is the valid "no selection yet" state, not an error:
/// period-based sections of the report are suppressed until the caller has a
/// complete range. `comparison_period: None` disables comparison output
/// everywhere, including the region table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportRequest {
    #[serde(default)]
    pub filter: FilterSelection,

    #[schemars(description = "User-selected main reporting period, if a complete range has been chosen")]
    pub main_period: Option<Period>,

    #[schemars(description = "Optional comparison baseline period")]
    pub comparison_period: Option<Period>,

    #[schemars(description = "Anchor date for the week/month/year-to-date windows")]
    pub today: NaiveDate,
}

impl ReportRequest {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReportRequest)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
