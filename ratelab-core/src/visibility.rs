//! Visibility selection — which competitors participate in analysis.
//!
//! An explicit value the caller owns and threads through calls, never
//! ambient state. The set only ever holds competitor ids drawn from the
//! catalog it was built against; the self channel is structurally absent and
//! implicitly included by every consumer. The selection survives series
//! regeneration untouched — it holds ids, not prices.

use crate::catalog::ChannelCatalog;
use crate::domain::ChannelId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The currently-enabled subset of competitor channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySelection {
    /// Competitor ids known to the source catalog; toggles outside this
    /// universe are no-ops.
    universe: BTreeSet<ChannelId>,
    visible: BTreeSet<ChannelId>,
}

impl VisibilitySelection {
    /// Start from the catalog's `default_visible` flags.
    pub fn from_catalog(catalog: &ChannelCatalog) -> Self {
        let universe: BTreeSet<_> =
            catalog.competitors().iter().map(|c| c.id.clone()).collect();
        let visible = catalog
            .competitors()
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.id.clone())
            .collect();
        Self { universe, visible }
    }

    /// Start with every competitor visible.
    pub fn all(catalog: &ChannelCatalog) -> Self {
        let universe: BTreeSet<_> =
            catalog.competitors().iter().map(|c| c.id.clone()).collect();
        Self { visible: universe.clone(), universe }
    }

    /// Start with no competitor visible (self-only view).
    pub fn none(catalog: &ChannelCatalog) -> Self {
        Self {
            universe: catalog.competitors().iter().map(|c| c.id.clone()).collect(),
            visible: BTreeSet::new(),
        }
    }

    /// Flip one competitor's visibility. Unknown ids — including the self
    /// channel's id, which is never part of the universe — are no-ops.
    pub fn toggle(&mut self, id: &ChannelId) {
        if !self.universe.contains(id) {
            return;
        }
        if !self.visible.remove(id) {
            self.visible.insert(id.clone());
        }
    }

    pub fn select_all(&mut self) {
        self.visible = self.universe.clone();
    }

    pub fn select_none(&mut self) {
        self.visible.clear();
    }

    /// The visible competitor ids. Consumers must treat this as a set; the
    /// analyzer orders channels by catalog declaration, not by this
    /// iteration order.
    pub fn current(&self) -> &BTreeSet<ChannelId> {
        &self.visible
    }

    pub fn is_visible(&self, id: &ChannelId) -> bool {
        self.visible.contains(id)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}
