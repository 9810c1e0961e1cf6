//! PositioningSnapshot — derived competitive standing for one price point.

use crate::domain::ChannelId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative price-position label derived from `rank / total_visible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    MostAffordable,
    Competitive,
    Premium,
    LuxuryPremium,
}

impl PercentileBand {
    /// Band for a 1-based rank within `total` visible channels.
    ///
    /// Thresholds are quartiles of the position ratio: <=0.25, <=0.50,
    /// <=0.75, above.
    pub fn from_position(rank: usize, total: usize) -> Self {
        debug_assert!(rank >= 1 && rank <= total);
        let p = rank as f64 / total as f64;
        if p <= 0.25 {
            PercentileBand::MostAffordable
        } else if p <= 0.50 {
            PercentileBand::Competitive
        } else if p <= 0.75 {
            PercentileBand::Premium
        } else {
            PercentileBand::LuxuryPremium
        }
    }
}

impl fmt::Display for PercentileBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PercentileBand::MostAffordable => "Most Affordable",
            PercentileBand::Competitive => "Competitive",
            PercentileBand::Premium => "Premium",
            PercentileBand::LuxuryPremium => "Luxury Premium",
        };
        write!(f, "{label}")
    }
}

/// Actionability tag derived from rank alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTag {
    Winning,
    Monitor,
    Action,
}

impl ClassificationTag {
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            1 => ClassificationTag::Winning,
            2..=3 => ClassificationTag::Monitor,
            _ => ClassificationTag::Action,
        }
    }
}

impl fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClassificationTag::Winning => "Winning",
            ClassificationTag::Monitor => "Monitor",
            ClassificationTag::Action => "Action",
        };
        write!(f, "{label}")
    }
}

/// Self versus the visible competitor market.
///
/// `NotApplicable` is the real state when the user has hidden every
/// competitor — there is no market to average, and reporting a numeric zero
/// would read as "priced exactly at market".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketComparison {
    NotApplicable,
    Relative {
        /// Mean price of visible competitors (self excluded).
        market_average: f64,
        /// Self price minus `market_average`.
        price_delta: f64,
        /// `price_delta / market_average * 100`.
        price_delta_percent: f64,
    },
}

impl MarketComparison {
    pub fn is_applicable(&self) -> bool {
        matches!(self, MarketComparison::Relative { .. })
    }
}

/// A visible competitor priced strictly below self on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub channel_id: ChannelId,
    pub display_name: String,
    pub price: u32,
    /// How far below self this competitor sits, in whole currency units.
    pub undercut: u32,
}

/// Competitive standing of the self channel for one price point.
///
/// Recomputed on demand (hover, selection); never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningSnapshot {
    pub date: NaiveDate,

    /// 1-based position of self among visible channels, ascending by price
    /// (1 = cheapest).
    pub rank: usize,

    /// Channels considered: self + visible competitors.
    pub total_visible: usize,

    pub comparison: MarketComparison,
    pub percentile_band: PercentileBand,
    pub classification: ClassificationTag,

    /// Visible competitors cheaper than self, ascending by price.
    pub threats: Vec<Threat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds_are_quartiles() {
        // 1/4 = 0.25 sits exactly on the first threshold.
        assert_eq!(PercentileBand::from_position(1, 4), PercentileBand::MostAffordable);
        assert_eq!(PercentileBand::from_position(2, 4), PercentileBand::Competitive);
        assert_eq!(PercentileBand::from_position(3, 4), PercentileBand::Premium);
        assert_eq!(PercentileBand::from_position(4, 4), PercentileBand::LuxuryPremium);
    }

    #[test]
    fn band_for_sole_channel_is_luxury_premium() {
        // rank 1 of 1: p = 1.0, above every threshold.
        assert_eq!(PercentileBand::from_position(1, 1), PercentileBand::LuxuryPremium);
    }

    #[test]
    fn classification_by_rank() {
        assert_eq!(ClassificationTag::from_rank(1), ClassificationTag::Winning);
        assert_eq!(ClassificationTag::from_rank(2), ClassificationTag::Monitor);
        assert_eq!(ClassificationTag::from_rank(3), ClassificationTag::Monitor);
        assert_eq!(ClassificationTag::from_rank(4), ClassificationTag::Action);
    }

    #[test]
    fn comparison_applicability() {
        assert!(!MarketComparison::NotApplicable.is_applicable());
        assert!(MarketComparison::Relative {
            market_average: 280.0,
            price_delta: 0.0,
            price_delta_percent: 0.0,
        }
        .is_applicable());
    }
}
