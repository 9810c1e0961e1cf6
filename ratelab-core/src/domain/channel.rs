//! Channel — a priced distribution outlet tracked by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel identifier.
///
/// `Ord` so that price maps and visibility sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Whether a channel is the operator's own outlet or a rival's.
///
/// Exactly one catalog channel carries `SelfChannel`; the catalog constructor
/// enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRole {
    SelfChannel,
    Competitor,
}

/// Immutable generation parameters for one channel.
///
/// Created once at process start (or loaded from a catalog file) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    pub id: ChannelId,
    pub display_name: String,
    pub role: ChannelRole,

    /// Average premium/discount versus the generic base rate. Must be > 0.
    pub base_multiplier: f64,

    /// Amplitude of the per-channel price oscillation.
    pub volatility_amplitude: f64,

    /// Frequency of the per-channel price oscillation (radians per day index).
    pub volatility_frequency: f64,

    /// Initial membership in the visibility selection.
    pub default_visible: bool,
}

impl ChannelDefinition {
    /// Competitor with the given generation parameters, visible by default.
    pub fn competitor(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_multiplier: f64,
        volatility_amplitude: f64,
        volatility_frequency: f64,
    ) -> Self {
        Self {
            id: ChannelId::new(id),
            display_name: display_name.into(),
            role: ChannelRole::Competitor,
            base_multiplier,
            volatility_amplitude,
            volatility_frequency,
            default_visible: true,
        }
    }

    /// The operator's own channel. Always visible downstream, so
    /// `default_visible` is fixed to true.
    pub fn self_channel(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_multiplier: f64,
        volatility_amplitude: f64,
        volatility_frequency: f64,
    ) -> Self {
        Self {
            id: ChannelId::new(id),
            display_name: display_name.into(),
            role: ChannelRole::SelfChannel,
            base_multiplier,
            volatility_amplitude,
            volatility_frequency,
            default_visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_id_display_and_order() {
        let a = ChannelId::new("booking");
        let b = ChannelId::new("expedia");
        assert_eq!(a.to_string(), "booking");
        assert!(a < b);
    }

    #[test]
    fn channel_definition_serialization_roundtrip() {
        let def = ChannelDefinition::competitor("ota_1", "TravelHub", 1.08, 0.04, 0.5);
        let json = serde_json::to_string(&def).unwrap();
        let deser: ChannelDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, deser);
    }

    #[test]
    fn hidden_clears_default_visibility() {
        let def = ChannelDefinition::competitor("ota_1", "TravelHub", 1.08, 0.04, 0.5).hidden();
        assert!(!def.default_visible);
    }
}
