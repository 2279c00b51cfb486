use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency and labeling configuration for a budget document.
///
/// The calculation engine consumes this only as passthrough context (cap
/// warnings and summaries display the base currency); rates are applied by
/// presentation layers, never inside the recalculation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Currency all line amounts are expressed in.
    #[serde(default = "default_currency")]
    pub base_currency: String,

    /// Exchange rate: 1 unit of base currency in USD.
    #[serde(default)]
    pub usd_rate: f64,

    /// Exchange rate: 1 unit of base currency in EUR.
    #[serde(default)]
    pub eur_rate: f64,

    /// Day the exchange rates were sourced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_date: Option<NaiveDate>,

    /// Donor label, stamped onto indexed cost records at save time.
    #[serde(default)]
    pub donor: String,

    /// Sector label, stamped onto indexed cost records at save time.
    #[serde(default)]
    pub sector: String,

    /// Budget year, stamped onto indexed cost records at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            base_currency: default_currency(),
            usd_rate: 0.0,
            eur_rate: 0.0,
            rate_date: None,
            donor: String::new(),
            sector: String::new(),
            year: None,
        }
    }
}
