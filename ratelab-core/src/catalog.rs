//! Channel catalog — the fixed registry of self + competitor channels.
//!
//! The catalog is configuration data supplied by the embedding application at
//! process start, either built in code or loaded from a TOML file. It encodes
//! two policies the rest of the engine relies on:
//!
//! - The self channel is a dedicated field, not a list entry, so "self is
//!   always included" cannot be broken by filtering a collection.
//! - Competitor declaration order is the documented tie-break order for
//!   equal prices in the positioning analysis.

use crate::domain::{ChannelDefinition, ChannelId, ChannelRole};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on competitor channels; the dashboard's comparison views are
/// designed for at most ten rivals.
pub const MAX_COMPETITORS: usize = 10;

/// Date rule that marks a day as an event day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventTrigger {
    /// Fires on the given day of every month.
    DayOfMonth { day: u32 },

    /// Fires on the given day of months whose number is divisible by
    /// `modulo` (e.g. `modulo = 3` → March, June, September, December).
    MonthModulo { modulo: u32, day: u32 },
}

impl EventTrigger {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            EventTrigger::DayOfMonth { day } => date.day() == day,
            EventTrigger::MonthModulo { modulo, day } => {
                modulo > 0 && date.month() % modulo == 0 && date.day() == day
            }
        }
    }
}

/// Named event rule. Rules are evaluated independently per day; every
/// matching rule contributes its name to `PricePoint::events`, but the rate
/// uplift is applied once no matter how many rules fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRule {
    pub name: String,
    pub trigger: EventTrigger,
}

impl EventRule {
    pub fn new(name: impl Into<String>, trigger: EventTrigger) -> Self {
        Self { name: name.into(), trigger }
    }
}

/// Static registry of the self channel and its competitors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCatalog {
    self_channel: ChannelDefinition,
    competitors: Vec<ChannelDefinition>,
    event_rules: Vec<EventRule>,
    promotion_channel: Option<ChannelId>,
}

impl ChannelCatalog {
    /// Build a catalog, validating roles, id uniqueness, multiplier
    /// positivity, and the competitor count bound.
    pub fn new(
        self_channel: ChannelDefinition,
        competitors: Vec<ChannelDefinition>,
    ) -> Result<Self, CatalogError> {
        if self_channel.role != ChannelRole::SelfChannel {
            return Err(CatalogError::SelfRoleMismatch { id: self_channel.id.clone() });
        }
        if competitors.len() > MAX_COMPETITORS {
            return Err(CatalogError::TooManyCompetitors { count: competitors.len() });
        }

        let mut seen = std::collections::BTreeSet::new();
        seen.insert(self_channel.id.clone());
        for competitor in &competitors {
            if competitor.role != ChannelRole::Competitor {
                return Err(CatalogError::CompetitorRoleMismatch {
                    id: competitor.id.clone(),
                });
            }
            if !seen.insert(competitor.id.clone()) {
                return Err(CatalogError::DuplicateId { id: competitor.id.clone() });
            }
        }

        for channel in std::iter::once(&self_channel).chain(competitors.iter()) {
            if channel.base_multiplier <= 0.0 {
                return Err(CatalogError::NonPositiveMultiplier {
                    id: channel.id.clone(),
                    multiplier: channel.base_multiplier,
                });
            }
        }

        Ok(Self {
            self_channel,
            competitors,
            event_rules: Vec::new(),
            promotion_channel: None,
        })
    }

    pub fn with_event_rules(mut self, rules: Vec<EventRule>) -> Self {
        self.event_rules = rules;
        self
    }

    /// Designate the competitor that runs a weekly promotion cycle.
    pub fn with_promotion_channel(mut self, id: ChannelId) -> Result<Self, CatalogError> {
        if !self.competitors.iter().any(|c| c.id == id) {
            return Err(CatalogError::UnknownPromotionChannel { id });
        }
        self.promotion_channel = Some(id);
        Ok(self)
    }

    pub fn self_channel(&self) -> &ChannelDefinition {
        &self.self_channel
    }

    pub fn competitors(&self) -> &[ChannelDefinition] {
        &self.competitors
    }

    /// All channels in declared order, self first.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelDefinition> {
        std::iter::once(&self.self_channel).chain(self.competitors.iter())
    }

    pub fn channel_count(&self) -> usize {
        1 + self.competitors.len()
    }

    pub fn get(&self, id: &ChannelId) -> Option<&ChannelDefinition> {
        self.channels().find(|c| &c.id == id)
    }

    pub fn is_competitor(&self, id: &ChannelId) -> bool {
        self.competitors.iter().any(|c| &c.id == id)
    }

    pub fn event_rules(&self) -> &[EventRule] {
        &self.event_rules
    }

    pub fn promotion_channel(&self) -> Option<&ChannelId> {
        self.promotion_channel.as_ref()
    }

    /// Event names active on `date`, in rule declaration order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<String> {
        self.event_rules
            .iter()
            .filter(|rule| rule.trigger.matches(date))
            .map(|rule| rule.name.clone())
            .collect()
    }

    /// Load a catalog from its TOML configuration form.
    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(input)?;
        let self_channel = file.self_channel.into_definition(ChannelRole::SelfChannel);
        let competitors = file
            .competitors
            .into_iter()
            .map(|spec| spec.into_definition(ChannelRole::Competitor))
            .collect();

        let mut catalog = Self::new(self_channel, competitors)?.with_event_rules(file.events);
        if let Some(id) = file.promotion_channel {
            catalog = catalog.with_promotion_channel(id)?;
        }
        Ok(catalog)
    }

    /// The demo catalog the dashboard ships with: one direct channel and ten
    /// rivals with varied premiums and oscillation profiles.
    pub fn sample() -> Self {
        let self_channel =
            ChannelDefinition::self_channel("direct", "Direct (Brand Site)", 1.0, 0.03, 0.45);
        let competitors = vec![
            ChannelDefinition::competitor("bookwell", "BookWell", 1.05, 0.04, 0.52),
            ChannelDefinition::competitor("staymart", "StayMart", 1.08, 0.05, 0.38),
            ChannelDefinition::competitor("roamly", "Roamly", 0.97, 0.06, 0.61),
            ChannelDefinition::competitor("tripnest", "TripNest", 1.03, 0.03, 0.44),
            ChannelDefinition::competitor("lastbed", "LastBed", 0.92, 0.07, 0.71),
            ChannelDefinition::competitor("suitely", "Suitely", 1.12, 0.04, 0.33).hidden(),
            ChannelDefinition::competitor("wanderin", "WanderInn", 0.99, 0.05, 0.56).hidden(),
            ChannelDefinition::competitor("cityotel", "CityOtel", 1.01, 0.04, 0.49).hidden(),
            ChannelDefinition::competitor("restio", "Restio", 0.95, 0.06, 0.64).hidden(),
            ChannelDefinition::competitor("grandhub", "GrandHub", 1.15, 0.03, 0.29).hidden(),
        ];

        Self::new(self_channel, competitors)
            .and_then(|catalog| catalog.with_promotion_channel(ChannelId::new("lastbed")))
            .map(|catalog| {
                catalog.with_event_rules(vec![
                    EventRule::new("City Festival", EventTrigger::DayOfMonth { day: 15 }),
                    EventRule::new("Concert Night", EventTrigger::DayOfMonth { day: 27 }),
                    EventRule::new(
                        "Trade Fair",
                        EventTrigger::MonthModulo { modulo: 3, day: 5 },
                    ),
                ])
            })
            .expect("sample catalog is statically valid")
    }
}

/// Serde shape of a catalog TOML file. Roles are positional (the
/// `[self_channel]` table versus `[[competitors]]` entries), so a file cannot
/// declare a second self channel.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    self_channel: ChannelSpec,
    #[serde(default)]
    competitors: Vec<ChannelSpec>,
    #[serde(default)]
    events: Vec<EventRule>,
    #[serde(default)]
    promotion_channel: Option<ChannelId>,
}

#[derive(Debug, Deserialize)]
struct ChannelSpec {
    id: ChannelId,
    display_name: String,
    base_multiplier: f64,
    #[serde(default)]
    volatility_amplitude: f64,
    #[serde(default)]
    volatility_frequency: f64,
    #[serde(default = "default_visible")]
    default_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ChannelSpec {
    fn into_definition(self, role: ChannelRole) -> ChannelDefinition {
        ChannelDefinition {
            id: self.id,
            display_name: self.display_name,
            role,
            base_multiplier: self.base_multiplier,
            volatility_amplitude: self.volatility_amplitude,
            volatility_frequency: self.volatility_frequency,
            default_visible: if role == ChannelRole::SelfChannel {
                true
            } else {
                self.default_visible
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("channel {id} must carry the self role")]
    SelfRoleMismatch { id: ChannelId },

    #[error("channel {id} must carry the competitor role")]
    CompetitorRoleMismatch { id: ChannelId },

    #[error("duplicate channel id {id}")]
    DuplicateId { id: ChannelId },

    #[error("catalog declares {count} competitors; at most {MAX_COMPETITORS} are supported")]
    TooManyCompetitors { count: usize },

    #[error("channel {id} has non-positive base multiplier {multiplier}")]
    NonPositiveMultiplier { id: ChannelId, multiplier: f64 },

    #[error("promotion channel {id} is not a declared competitor")]
    UnknownPromotionChannel { id: ChannelId },

    #[error("catalog file parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sample_catalog_is_valid() {
        let catalog = ChannelCatalog::sample();
        assert_eq!(catalog.competitors().len(), MAX_COMPETITORS);
        assert_eq!(catalog.channel_count(), MAX_COMPETITORS + 1);
        assert!(catalog.promotion_channel().is_some());
        let visible = catalog.competitors().iter().filter(|c| c.default_visible).count();
        // Default view keeps the recommended 3-5 competitors on.
        assert_eq!(visible, 5);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            vec![
                ChannelDefinition::competitor("a", "A", 1.1, 0.0, 0.0),
                ChannelDefinition::competitor("a", "A again", 0.9, 0.0, 0.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
    }

    #[test]
    fn rejects_competitor_with_self_role() {
        let err = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            vec![ChannelDefinition::self_channel("other", "Other", 1.1, 0.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::CompetitorRoleMismatch { .. }));
    }

    #[test]
    fn rejects_eleventh_competitor() {
        let competitors: Vec<_> = (0..=MAX_COMPETITORS)
            .map(|i| ChannelDefinition::competitor(format!("c{i}"), format!("C{i}"), 1.0, 0.0, 0.0))
            .collect();
        let err = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            competitors,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::TooManyCompetitors { count: 11 }));
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let err = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 0.0, 0.0, 0.0),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::NonPositiveMultiplier { .. }));
    }

    #[test]
    fn promotion_channel_must_be_a_competitor() {
        let catalog = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            vec![ChannelDefinition::competitor("a", "A", 1.1, 0.0, 0.0)],
        )
        .unwrap();
        let err = catalog
            .clone()
            .with_promotion_channel(ChannelId::new("direct"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPromotionChannel { .. }));
        assert!(catalog.with_promotion_channel(ChannelId::new("a")).is_ok());
    }

    #[test]
    fn day_of_month_trigger() {
        let trigger = EventTrigger::DayOfMonth { day: 15 };
        assert!(trigger.matches(d(2024, 1, 15)));
        assert!(trigger.matches(d(2024, 7, 15)));
        assert!(!trigger.matches(d(2024, 7, 14)));
    }

    #[test]
    fn month_modulo_trigger() {
        let trigger = EventTrigger::MonthModulo { modulo: 3, day: 5 };
        assert!(trigger.matches(d(2024, 3, 5)));
        assert!(trigger.matches(d(2024, 12, 5)));
        assert!(!trigger.matches(d(2024, 4, 5)));
        assert!(!trigger.matches(d(2024, 3, 6)));
    }

    #[test]
    fn events_on_collects_all_matching_rule_names() {
        let catalog = ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            vec![],
        )
        .unwrap()
        .with_event_rules(vec![
            EventRule::new("Festival", EventTrigger::DayOfMonth { day: 5 }),
            EventRule::new("Fair", EventTrigger::MonthModulo { modulo: 3, day: 5 }),
        ]);

        // Both rules fire on March 5th; names are collected independently.
        assert_eq!(catalog.events_on(d(2024, 3, 5)), vec!["Festival", "Fair"]);
        assert_eq!(catalog.events_on(d(2024, 4, 5)), vec!["Festival"]);
        assert!(catalog.events_on(d(2024, 4, 6)).is_empty());
    }

    #[test]
    fn catalog_loads_from_toml() {
        let toml_src = r#"
            promotion_channel = "lastbed"

            [self_channel]
            id = "direct"
            display_name = "Direct"
            base_multiplier = 1.0

            [[competitors]]
            id = "bookwell"
            display_name = "BookWell"
            base_multiplier = 1.05
            volatility_amplitude = 0.04
            volatility_frequency = 0.5

            [[competitors]]
            id = "lastbed"
            display_name = "LastBed"
            base_multiplier = 0.92
            default_visible = false

            [[events]]
            name = "City Festival"
            trigger = { type = "day_of_month", day = 15 }
        "#;

        let catalog = ChannelCatalog::from_toml_str(toml_src).unwrap();
        assert_eq!(catalog.self_channel().id, ChannelId::new("direct"));
        assert_eq!(catalog.competitors().len(), 2);
        assert_eq!(catalog.promotion_channel(), Some(&ChannelId::new("lastbed")));
        assert_eq!(catalog.event_rules().len(), 1);
        assert!(!catalog.competitors()[1].default_visible);
    }

    #[test]
    fn toml_self_channel_cannot_opt_out_of_visibility() {
        let toml_src = r#"
            [self_channel]
            id = "direct"
            display_name = "Direct"
            base_multiplier = 1.0
            default_visible = false
        "#;
        let catalog = ChannelCatalog::from_toml_str(toml_src).unwrap();
        assert!(catalog.self_channel().default_visible);
    }
}
