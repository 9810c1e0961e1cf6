//! PricePoint — one generated row of the rate series.

use crate::domain::ChannelId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of generated rates across every catalog channel.
///
/// `prices` carries an entry for every channel in the catalog regardless of
/// visibility — the visibility selection filters analysis and display, never
/// generation. All amounts are whole currency units and strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,

    /// Channel id -> nightly rate in whole currency units.
    pub prices: BTreeMap<ChannelId, u32>,

    /// Informational occupancy percentage, clamped to 0..=100.
    pub occupancy_estimate: u8,

    /// Names of event rules active on this date. Empty on ordinary days.
    pub events: Vec<String>,
}

impl PricePoint {
    pub fn price(&self, id: &ChannelId) -> Option<u32> {
        self.prices.get(id).copied()
    }

    pub fn has_event(&self) -> bool {
        !self.events.is_empty()
    }
}
