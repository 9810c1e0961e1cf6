//! Series generator — synthesizes the multi-channel daily rate series.
//!
//! Pure arithmetic over (window, catalog, profile, seed): the same inputs
//! always produce the same series. The series is cheap to build, so every
//! window or catalog change regenerates it wholesale rather than patching.

use crate::catalog::ChannelCatalog;
use crate::domain::{ChannelId, DateRange, PricePoint};
use crate::rng::SeriesSeed;
use chrono::{Datelike, Weekday};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric knobs of the generation algorithm.
///
/// `Default` carries the dashboard's production values; tests that need an
/// exact price shape use [`GeneratorProfile::noiseless`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorProfile {
    /// Generic nightly base rate before any factor is applied.
    pub base_rate: f64,
    /// Uniform per-day jitter added to the base rate.
    pub base_jitter: f64,

    /// Multiplier applied on Saturdays and Sundays.
    pub weekend_factor: f64,
    /// Amplitude of the one-cycle seasonal swing across the window.
    pub seasonal_amplitude: f64,
    /// Multiplier applied on event days (once, however many rules fire).
    pub event_factor: f64,

    /// Upward drift reached by the end of long windows.
    pub trend_drift: f64,
    /// Windows longer than this many days get the drift.
    pub trend_min_days: i64,

    /// Uniform per-channel, per-day noise added to the channel factor.
    pub channel_noise: f64,
    /// Discount multiplier for the promotion-cycle channel.
    pub promo_discount: f64,
    /// The promotion fires every this-many day indices (index 0 included).
    pub promo_period_days: usize,

    /// Occupancy baseline percentage.
    pub occupancy_base: f64,
    /// Uniform occupancy jitter.
    pub occupancy_jitter: f64,
    /// Occupancy boost per active event.
    pub occupancy_event_boost: f64,
}

impl Default for GeneratorProfile {
    fn default() -> Self {
        Self {
            base_rate: 280.0,
            base_jitter: 20.0,
            weekend_factor: 1.15,
            seasonal_amplitude: 0.2,
            event_factor: 1.25,
            trend_drift: 0.1,
            trend_min_days: 30,
            channel_noise: 0.05,
            promo_discount: 0.9,
            promo_period_days: 7,
            occupancy_base: 75.0,
            occupancy_jitter: 15.0,
            occupancy_event_boost: 10.0,
        }
    }
}

impl GeneratorProfile {
    /// Production profile with every random term zeroed. The deterministic
    /// factors (weekend, seasonal, event, trend, promotion) still apply.
    pub fn noiseless() -> Self {
        Self {
            base_jitter: 0.0,
            channel_noise: 0.0,
            occupancy_jitter: 0.0,
            ..Self::default()
        }
    }
}

/// Generate one `PricePoint` per calendar day in `range`, ascending.
///
/// Every catalog channel is priced on every day; the visibility selection
/// never filters generation. Callers holding an incomplete window never get
/// here — `DateRange` cannot represent one.
pub fn generate(
    range: &DateRange,
    catalog: &ChannelCatalog,
    profile: &GeneratorProfile,
    seed: SeriesSeed,
) -> Vec<PricePoint> {
    let mut rng = seed.rng_for(range);
    let total_days = range.num_days();
    let n = total_days as f64;

    range
        .iter_days()
        .enumerate()
        .map(|(i, date)| {
            let day_index = i as f64;

            let base = profile.base_rate + uniform(&mut rng, profile.base_jitter);

            let weekend_factor = if is_weekend(date) {
                profile.weekend_factor
            } else {
                1.0
            };

            // One full seasonal cycle across the selected window.
            let seasonal_factor =
                1.0 + profile.seasonal_amplitude * (std::f64::consts::TAU * day_index / n).sin();

            let events = catalog.events_on(date);
            let event_factor = if events.is_empty() {
                1.0
            } else {
                profile.event_factor
            };

            // Only long windows drift upward.
            let trend_factor = if total_days > profile.trend_min_days {
                1.0 + (day_index / n) * profile.trend_drift
            } else {
                1.0
            };

            let day_rate = base * weekend_factor * seasonal_factor * event_factor * trend_factor;

            let mut prices = BTreeMap::new();
            for channel in catalog.channels() {
                let mut channel_factor = channel.base_multiplier
                    + (day_index * channel.volatility_frequency).sin()
                        * channel.volatility_amplitude
                    + uniform(&mut rng, profile.channel_noise);

                if profile.promo_period_days > 0
                    && catalog.promotion_channel() == Some(&channel.id)
                    && i % profile.promo_period_days == 0
                {
                    channel_factor *= profile.promo_discount;
                }

                prices.insert(channel.id.clone(), to_amount(day_rate * channel_factor));
            }

            let occupancy = profile.occupancy_base
                + uniform(&mut rng, profile.occupancy_jitter)
                + profile.occupancy_event_boost * events.len() as f64;

            PricePoint {
                date,
                prices,
                occupancy_estimate: occupancy.round().clamp(0.0, 100.0) as u8,
                events,
            }
        })
        .collect()
}

/// Convenience: self channel's price for the day.
pub fn self_price(point: &PricePoint, catalog: &ChannelCatalog) -> Option<u32> {
    point.price(&catalog.self_channel().id)
}

fn is_weekend(date: chrono::NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Uniform draw in `[-amplitude, amplitude]`; zero amplitude draws nothing.
fn uniform(rng: &mut StdRng, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

/// Round to a whole currency amount, floored at 1 so the positivity
/// invariant holds for any profile/catalog combination.
fn to_amount(value: f64) -> u32 {
    let rounded = value.round();
    if rounded < 1.0 {
        1
    } else {
        rounded as u32
    }
}
