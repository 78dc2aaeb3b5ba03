//! Cumulative-weight tables derived from a pool for one reward screen.
//!
//! RULES:
//!   - Building a table draws nothing from the RNG.
//!   - Entries keep their declaration index; a zero-weight entry gets
//!     no boundary and is listed as ignored.
//!   - Identical inputs produce identical tables.

use crate::{
    catalog::Catalog,
    config::{EngineConfig, TierBands},
    error::RewardResult,
    item::ItemKind,
    party::PartyView,
    pools::{ModifierPool, WeightedEntry},
    types::{PoolKind, Tier},
    weights::WeightInput,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// `(cumulative boundary, entry index)`, strictly ascending.
    pub boundaries: Vec<(u32, usize)>,
    /// Entries whose weight came out as zero this round.
    pub ignored: Vec<usize>,
    /// Effective weight of every entry, in declaration order.
    pub weights: Vec<u32>,
    pub total: u32,
}

impl TierThresholds {
    pub fn is_selectable(&self) -> bool {
        self.total > 0
    }

    /// Entry owning the first boundary strictly above `value`.
    pub fn index_for(&self, value: u32) -> Option<usize> {
        self.boundaries
            .iter()
            .find(|(boundary, _)| value < *boundary)
            .map(|(_, index)| *index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolThresholds {
    pub pool: PoolKind,
    pub reroll_count: u32,
    pub tiers: BTreeMap<Tier, TierThresholds>,
}

impl PoolThresholds {
    pub fn tier(&self, tier: Tier) -> Option<&TierThresholds> {
        self.tiers.get(&tier)
    }

    pub fn total(&self, tier: Tier) -> u32 {
        self.tier(tier).map_or(0, |t| t.total)
    }
}

/// Build every tier of `pool` against the current party.
pub fn build_thresholds(
    pool: &ModifierPool,
    catalog: &Catalog,
    view: PartyView<'_>,
    reroll_count: u32,
    config: &EngineConfig,
) -> RewardResult<PoolThresholds> {
    let input = WeightInput {
        view,
        reroll_count,
        config,
    };
    let mut tiers = BTreeMap::new();
    for tier in Tier::ROLLABLE {
        let mut table = TierThresholds::default();
        for (index, entry) in pool.entries(tier).iter().enumerate() {
            let kind = catalog.require(entry.kind_id)?;
            let weight = entry_weight(pool.kind(), entry, kind, &input);
            table.weights.push(weight);
            if weight == 0 {
                table.ignored.push(index);
                continue;
            }
            table.total += weight;
            table.boundaries.push((table.total, index));
        }
        tiers.insert(tier, table);
    }
    Ok(PoolThresholds {
        pool: pool.kind(),
        reroll_count,
        tiers,
    })
}

fn entry_weight(pool: PoolKind, entry: &WeightedEntry, kind: &ItemKind, input: &WeightInput<'_>) -> u32 {
    let held = input.view.ledger.stacks(kind.id(), pool.ledger_side());
    let capped = !held.is_empty() && !kind.class().ignores_stack_cap() && !held.iter().any(|s| s.has_room());
    if capped {
        return 0;
    }
    if let Some(generator) = kind.generator() {
        if !generator.is_applicable(input.view) {
            return 0;
        }
    }
    entry.weight.evaluate(input)
}

/// One row of the item-odds table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsLine {
    pub kind_id: String,
    pub tier: Tier,
    pub weight: u32,
    pub tier_percent: f64,
    pub total_percent: f64,
}

/// Per-item odds for analytics displays. Entries without a declared
/// ceiling are left out.
pub fn odds_report(
    pool: &ModifierPool,
    thresholds: &PoolThresholds,
    bands: &TierBands,
    use_max_weight: bool,
) -> Vec<OddsLine> {
    let mut lines = Vec::new();
    for tier in Tier::ROLLABLE {
        let Some(table) = thresholds.tier(tier) else {
            continue;
        };
        let rows: Vec<(&str, u32)> = pool
            .entries(tier)
            .iter()
            .enumerate()
            .filter(|(_, e)| e.max_weight > 0)
            .map(|(i, e)| {
                let live = table.weights.get(i).copied().unwrap_or(0);
                (e.kind_id, if use_max_weight { e.max_weight } else { live })
            })
            .collect();
        let tier_max: u32 = rows.iter().map(|(_, w)| *w).sum();
        let band = bands.probability(tier);
        for (kind_id, weight) in rows {
            let tier_percent = if tier_max == 0 {
                0.0
            } else {
                (weight as f64 / tier_max as f64 * 10000.0).floor() / 100.0
            };
            let total_percent = (tier_percent * band * 100.0).floor() / 100.0;
            lines.push(OddsLine {
                kind_id: kind_id.to_string(),
                tier,
                weight,
                tier_percent,
                total_percent,
            });
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lookup_uses_strict_upper_bound() {
        let table = TierThresholds {
            boundaries: vec![(3, 0), (5, 2)],
            ignored: vec![1],
            weights: vec![3, 0, 2],
            total: 5,
        };
        assert_eq!(table.index_for(0), Some(0));
        assert_eq!(table.index_for(2), Some(0));
        assert_eq!(table.index_for(3), Some(2));
        assert_eq!(table.index_for(5), None);
    }
}
