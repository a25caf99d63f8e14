//! Pane allocation policy.
//!
//! Decides which pane an indicator's series occupy. Pane 0 is reserved for
//! price candles and pane 1 is shared with volume bars; oscillator panes are
//! allocated from pane 2 upwards. Indicators of the same family may share an
//! oscillator pane (with distinct price scales), unrelated families never
//! collide silently.

use std::collections::BTreeMap;

use super::base::{
    FIRST_OSCILLATOR_PANE, PRICE_PANE, RIGHT_PRICE_SCALE, VOLUME_PANE,
};
use crate::indicator::IndicatorType;

/// Declared pane preference of an indicator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePreference {
    /// Overlay on the main price pane
    Main,
    /// Share the volume pane
    VolumeShared,
    /// Oscillator pane, exclusive to one indicator family
    OscillatorOwn,
}

/// Pane preference for an indicator type
pub fn preference_for(indicator_type: IndicatorType) -> PanePreference {
    match indicator_type {
        IndicatorType::Sma
        | IndicatorType::Ema
        | IndicatorType::Bollinger
        | IndicatorType::Ichimoku => PanePreference::Main,
        IndicatorType::Rsi
        | IndicatorType::Macd
        | IndicatorType::Atr
        | IndicatorType::Stochastic => PanePreference::OscillatorOwn,
    }
}

/// Price scale id for an indicator instance.
///
/// Main-pane overlays share the candle scale so they track price; everything
/// else gets a per-instance scale so co-tenant indicators never rescale each
/// other's value axis.
pub fn price_scale_id(preference: PanePreference, instance_id: &str) -> String {
    match preference {
        PanePreference::Main => RIGHT_PRICE_SCALE.to_string(),
        PanePreference::VolumeShared | PanePreference::OscillatorOwn => {
            format!("scale-{}", instance_id)
        }
    }
}

/// One indicator occupying a pane
#[derive(Debug, Clone, PartialEq, Eq)]
struct PaneOccupant {
    instance_id: String,
    family: IndicatorType,
}

/// Tracks which indicator families occupy which panes.
///
/// Pane assignment decisions are serialized through this allocator: it is
/// consulted once per indicator add and again only on explicit
/// reconfiguration.
#[derive(Debug, Default)]
pub struct PaneAllocator {
    occupants: BTreeMap<usize, Vec<PaneOccupant>>,
}

impl PaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the pane for an indicator being added.
    ///
    /// An explicit pane index from a persisted config or user choice wins
    /// verbatim; otherwise the type preference applies, with oscillator
    /// panes reused only by the same family.
    pub fn resolve(
        &mut self,
        indicator_type: IndicatorType,
        instance_id: &str,
        explicit: Option<usize>,
    ) -> usize {
        let pane = match explicit {
            Some(pane) => pane,
            None => match preference_for(indicator_type) {
                PanePreference::Main => PRICE_PANE,
                PanePreference::VolumeShared => VOLUME_PANE,
                PanePreference::OscillatorOwn => self.resolve_oscillator(indicator_type),
            },
        };

        self.occupants.entry(pane).or_default().push(PaneOccupant {
            instance_id: instance_id.to_string(),
            family: indicator_type,
        });
        pane
    }

    /// Find an oscillator pane compatible with the family, or allocate a
    /// fresh one
    fn resolve_oscillator(&self, family: IndicatorType) -> usize {
        for (&pane, occupants) in self.occupants.range(FIRST_OSCILLATOR_PANE..) {
            if !occupants.is_empty() && occupants.iter().all(|o| o.family == family) {
                tracing::debug!(pane, family = family.as_str(), "sharing oscillator pane");
                return pane;
            }
        }

        let pane = self.next_pane_index();
        tracing::debug!(pane, family = family.as_str(), "allocating oscillator pane");
        pane
    }

    /// Next free pane index past every occupied pane
    fn next_pane_index(&self) -> usize {
        let highest = self
            .occupants
            .iter()
            .filter(|(_, occupants)| !occupants.is_empty())
            .map(|(&pane, _)| pane)
            .max()
            .unwrap_or(VOLUME_PANE);
        highest.max(VOLUME_PANE) + 1
    }

    /// Release the slot held by an instance
    pub fn release(&mut self, instance_id: &str) {
        for occupants in self.occupants.values_mut() {
            occupants.retain(|o| o.instance_id != instance_id);
        }
        self.occupants.retain(|_, occupants| !occupants.is_empty());
    }

    /// Panes that currently host at least one indicator
    pub fn occupied_panes(&self) -> Vec<usize> {
        self.occupants.keys().copied().collect()
    }

    /// Number of indicators on a pane
    pub fn occupant_count(&self, pane: usize) -> usize {
        self.occupants.get(&pane).map_or(0, Vec::len)
    }
}
