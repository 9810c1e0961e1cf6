//! Positioning analyzer — competitive standing of self for one price point.
//!
//! Stateless: (price point, visibility selection, catalog) in, snapshot out.
//! Recomputed per displayed point (hover, row selection) and never cached.

use crate::catalog::ChannelCatalog;
use crate::domain::{
    ChannelId, ClassificationTag, MarketComparison, PercentileBand, PositioningSnapshot,
    PricePoint, Threat,
};
use crate::visibility::VisibilitySelection;
use thiserror::Error;

/// Caller-misuse errors. A point produced by `series::generate` over the
/// same catalog can never trigger these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositioningError {
    #[error("price point {date} has no price for channel {id}")]
    MissingPrice {
        date: chrono::NaiveDate,
        id: ChannelId,
    },
}

/// Compute the positioning snapshot for one price point.
///
/// The working set is self plus the visible competitors, assembled in
/// catalog declaration order and stably sorted by price — so equal prices
/// rank in declaration order, a documented policy rather than a sort
/// accident. Self is a dedicated catalog field and therefore present in
/// every working set regardless of the selection's state.
pub fn analyze(
    point: &PricePoint,
    selection: &VisibilitySelection,
    catalog: &ChannelCatalog,
) -> Result<PositioningSnapshot, PositioningError> {
    let self_id = &catalog.self_channel().id;
    let self_price = price_of(point, self_id)?;

    // Working set in declaration order: self first, then visible competitors.
    let mut working: Vec<(&ChannelId, u32)> = vec![(self_id, self_price)];
    for competitor in catalog.competitors() {
        if selection.is_visible(&competitor.id) {
            working.push((&competitor.id, price_of(point, &competitor.id)?));
        }
    }

    working.sort_by_key(|&(_, price)| price);

    let total_visible = working.len();
    // Self was pushed into the working set above, so the lookup cannot fail.
    let rank = working
        .iter()
        .position(|&(id, _)| id == self_id)
        .map(|index| index + 1)
        .expect("self channel is always in the working set");

    let competitor_prices: Vec<u32> = working
        .iter()
        .filter(|&&(id, _)| id != self_id)
        .map(|&(_, price)| price)
        .collect();

    let comparison = if competitor_prices.is_empty() {
        MarketComparison::NotApplicable
    } else {
        let market_average =
            competitor_prices.iter().map(|&p| p as f64).sum::<f64>() / competitor_prices.len() as f64;
        let price_delta = self_price as f64 - market_average;
        MarketComparison::Relative {
            market_average,
            price_delta,
            price_delta_percent: price_delta / market_average * 100.0,
        }
    };

    // Already price-ascending thanks to the sort above.
    let threats = working
        .iter()
        .filter(|&&(id, price)| id != self_id && price < self_price)
        .map(|&(id, price)| {
            let display_name = catalog
                .get(id)
                .map(|c| c.display_name.clone())
                .unwrap_or_else(|| id.to_string());
            Threat {
                channel_id: id.clone(),
                display_name,
                price,
                undercut: self_price - price,
            }
        })
        .collect();

    Ok(PositioningSnapshot {
        date: point.date,
        rank,
        total_visible,
        comparison,
        percentile_band: PercentileBand::from_position(rank, total_visible),
        classification: ClassificationTag::from_rank(rank),
        threats,
    })
}

fn price_of(point: &PricePoint, id: &ChannelId) -> Result<u32, PositioningError> {
    point.price(id).ok_or_else(|| PositioningError::MissingPrice {
        date: point.date,
        id: id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChannelDefinition;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn catalog() -> ChannelCatalog {
        ChannelCatalog::new(
            ChannelDefinition::self_channel("direct", "Direct", 1.0, 0.0, 0.0),
            vec![
                ChannelDefinition::competitor("a", "A", 1.1, 0.0, 0.0),
                ChannelDefinition::competitor("b", "B", 0.9, 0.0, 0.0),
                ChannelDefinition::competitor("c", "C", 1.0, 0.0, 0.0),
            ],
        )
        .unwrap()
    }

    fn point(prices: &[(&str, u32)]) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            prices: prices
                .iter()
                .map(|&(id, price)| (ChannelId::new(id), price))
                .collect::<BTreeMap<_, _>>(),
            occupancy_estimate: 75,
            events: Vec::new(),
        }
    }

    #[test]
    fn ranks_self_among_visible_channels() {
        let catalog = catalog();
        let selection = VisibilitySelection::all(&catalog);
        let point = point(&[("direct", 280), ("a", 308), ("b", 252), ("c", 290)]);

        let snapshot = analyze(&point, &selection, &catalog).unwrap();
        assert_eq!(snapshot.rank, 2);
        assert_eq!(snapshot.total_visible, 4);
        assert_eq!(snapshot.classification, ClassificationTag::Monitor);
        assert_eq!(snapshot.percentile_band, PercentileBand::Competitive);
        assert_eq!(snapshot.threats.len(), 1);
        assert_eq!(snapshot.threats[0].channel_id, ChannelId::new("b"));
        assert_eq!(snapshot.threats[0].undercut, 28);
    }

    #[test]
    fn equal_prices_rank_in_declaration_order() {
        let catalog = catalog();
        let selection = VisibilitySelection::all(&catalog);
        // Self ties with c; self is declared first, so self ranks ahead.
        let point = point(&[("direct", 280), ("a", 280), ("b", 280), ("c", 280)]);

        let snapshot = analyze(&point, &selection, &catalog).unwrap();
        assert_eq!(snapshot.rank, 1);
        assert!(snapshot.threats.is_empty());
    }

    #[test]
    fn hidden_competitors_are_excluded_from_analysis() {
        let catalog = catalog();
        let mut selection = VisibilitySelection::all(&catalog);
        selection.toggle(&ChannelId::new("b"));

        let point = point(&[("direct", 280), ("a", 308), ("b", 252), ("c", 290)]);
        let snapshot = analyze(&point, &selection, &catalog).unwrap();
        // b hidden: self is now cheapest of {direct, a, c}.
        assert_eq!(snapshot.rank, 1);
        assert_eq!(snapshot.total_visible, 3);
        assert_eq!(snapshot.classification, ClassificationTag::Winning);
        assert!(snapshot.threats.is_empty());
        match snapshot.comparison {
            MarketComparison::Relative { market_average, .. } => {
                assert_eq!(market_average, (308.0 + 290.0) / 2.0);
            }
            MarketComparison::NotApplicable => panic!("market exists"),
        }
    }

    #[test]
    fn all_hidden_is_not_applicable_not_zero() {
        let catalog = catalog();
        let selection = VisibilitySelection::none(&catalog);
        let point = point(&[("direct", 280), ("a", 308), ("b", 252), ("c", 290)]);

        let snapshot = analyze(&point, &selection, &catalog).unwrap();
        assert_eq!(snapshot.rank, 1);
        assert_eq!(snapshot.total_visible, 1);
        assert_eq!(snapshot.comparison, MarketComparison::NotApplicable);
        assert_eq!(snapshot.classification, ClassificationTag::Winning);
        assert!(snapshot.threats.is_empty());
    }

    #[test]
    fn threats_are_ascending_by_price() {
        let catalog = catalog();
        let selection = VisibilitySelection::all(&catalog);
        let point = point(&[("direct", 300), ("a", 290), ("b", 250), ("c", 270)]);

        let snapshot = analyze(&point, &selection, &catalog).unwrap();
        let prices: Vec<u32> = snapshot.threats.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![250, 270, 290]);
        assert_eq!(snapshot.rank, 4);
        assert_eq!(snapshot.percentile_band, PercentileBand::LuxuryPremium);
        assert_eq!(snapshot.classification, ClassificationTag::Action);
    }

    #[test]
    fn missing_price_is_reported_not_guessed() {
        let catalog = catalog();
        let selection = VisibilitySelection::all(&catalog);
        let point = point(&[("direct", 300), ("a", 290)]);

        let err = analyze(&point, &selection, &catalog).unwrap_err();
        assert!(matches!(err, PositioningError::MissingPrice { .. }));
    }
}
