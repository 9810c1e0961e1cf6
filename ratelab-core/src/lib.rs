//! RateLab Core — synthetic competitive rate series and positioning engine.
//!
//! This crate contains the computational heart of the revenue dashboard:
//! - Domain types (channels, date ranges, price points, snapshots)
//! - Channel catalog with event rules and the promotion cycle
//! - Seeded series generator (one price point per day, every channel priced)
//! - Visibility selection over competitor channels
//! - Positioning analyzer (rank, percentile band, actionability tag, threats)
//!
//! Everything is pure and synchronous: the generator and analyzer can be
//! called straight from a UI event handler. Rendering, persistence, and the
//! date-range picker live in the embedding application.

pub mod catalog;
pub mod domain;
pub mod positioning;
pub mod rng;
pub mod series;
pub mod visibility;

pub use catalog::{ChannelCatalog, CatalogError, EventRule, EventTrigger, MAX_COMPETITORS};
pub use domain::{
    ChannelDefinition, ChannelId, ChannelRole, ClassificationTag, DateRange, MarketComparison,
    PercentileBand, PositioningSnapshot, PricePoint, RangeError, Threat,
};
pub use positioning::{analyze, PositioningError};
pub use rng::SeriesSeed;
pub use series::{generate, GeneratorProfile};
pub use visibility::VisibilitySelection;
