//! Domain types for the RateLab engine.

pub mod channel;
pub mod point;
pub mod range;
pub mod snapshot;

pub use channel::{ChannelDefinition, ChannelId, ChannelRole};
pub use point::PricePoint;
pub use range::{DateRange, RangeError};
pub use snapshot::{
    ClassificationTag, MarketComparison, PercentileBand, PositioningSnapshot, Threat,
};
