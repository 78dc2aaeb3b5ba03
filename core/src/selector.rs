//! Tier & slot selection.
//!
//! DRAW ORDER (fixed, part of the replay contract):
//!   1. Tier roll in `[0, roll_range)`, unless the caller pinned a tier.
//!   2. Luck escalation rolls, player pool only, skipped when the tier
//!      roll was 0. With a pinned tier and no upgrade count, the
//!      shiny-driven upgrade rolls run instead.
//!   3. Slot roll over the tier's threshold total.
//!   4. One generator roll if the slot holds a generator.
//!   On a null generation the sequence restarts at step 3 with the
//!   tier pinned.
//!
//! Empty-tier fallback steps down one tier at a time and spends one
//! escalation unit per step while any remain.

use crate::{
    catalog::Catalog,
    config::EngineConfig,
    error::{RewardError, RewardResult},
    item::ConcreteItem,
    party::PartyView,
    pools::ModifierPool,
    rng::RewardRng,
    thresholds::PoolThresholds,
    types::{PoolKind, Tier},
};
use serde::{Deserialize, Serialize};

/// How a single draw is constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawRequest {
    /// Pinned tier; `None` rolls one.
    pub tier: Option<Tier>,
    /// Escalations already granted. `None` with a pinned player tier
    /// triggers shiny upgrade rolls.
    pub upgrades: Option<u32>,
}

impl DrawRequest {
    pub fn rolled() -> Self {
        Self::default()
    }

    pub fn rolled_with_upgrades(upgrades: u32) -> Self {
        Self {
            tier: None,
            upgrades: Some(upgrades),
        }
    }

    pub fn pinned(tier: Tier) -> Self {
        Self {
            tier: Some(tier),
            upgrades: None,
        }
    }

    /// Redraw at exactly `tier`, carrying `upgrades` forward.
    pub fn retry(tier: Tier, upgrades: u32) -> Self {
        Self {
            tier: Some(tier),
            upgrades: Some(upgrades),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub item: ConcreteItem,
    pub tier: Tier,
    pub upgrade_count: u32,
    pub entry_index: usize,
    /// Null generations absorbed before this result.
    pub generator_retries: u32,
}

pub struct Selector<'a> {
    pool: &'a ModifierPool,
    thresholds: &'a PoolThresholds,
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> Selector<'a> {
    pub fn new(
        pool: &'a ModifierPool,
        thresholds: &'a PoolThresholds,
        catalog: &'a Catalog,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            pool,
            thresholds,
            catalog,
            config,
        }
    }

    pub fn pool_kind(&self) -> PoolKind {
        self.pool.kind()
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Has entries and a non-zero threshold total.
    pub fn is_available(&self, tier: Tier) -> bool {
        self.pool.has_entries(tier) && self.thresholds.total(tier) > 0
    }

    pub fn draw(
        &self,
        view: PartyView<'_>,
        request: DrawRequest,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<Selection> {
        let player = self.pool.kind().is_player_facing();
        let (tier, upgrades) = match (request.tier, request.upgrades) {
            (None, preset) => self.roll_tier(view, preset.unwrap_or(0), player, rng),
            (Some(tier), None) if player => self.roll_pinned_upgrades(view, tier, rng),
            (Some(tier), preset) => (tier, preset.unwrap_or(0)),
        };
        let (mut tier, mut upgrades) = self.fall_back(tier, upgrades)?;

        let cap = self.config.retries.generator_cap;
        let mut retries_at_tier = 0;
        let mut generator_retries = 0;
        loop {
            let table = self
                .thresholds
                .tier(tier)
                .ok_or(RewardError::EmptyTier { pool: self.pool.kind(), tier })?;
            let value = rng.next_int(table.total, "Weighted modifier selection");
            let index = table
                .index_for(value)
                .ok_or(RewardError::EmptyTier { pool: self.pool.kind(), tier })?;
            let entry = &self.pool.entries(tier)[index];
            let kind = self.catalog.require(entry.kind_id)?;

            if let Some(item) = self.catalog.resolve(kind, view, None, rng) {
                return Ok(Selection {
                    item,
                    tier,
                    upgrade_count: upgrades,
                    entry_index: index,
                    generator_retries,
                });
            }

            retries_at_tier += 1;
            generator_retries += 1;
            log::debug!(
                "pool={} tier={tier} generator {} returned nothing (retry {retries_at_tier})",
                self.pool.kind(),
                kind.id()
            );
            if retries_at_tier < cap {
                continue;
            }
            let Some(lower) = tier.lower() else {
                return Err(RewardError::GeneratorExhausted {
                    pool: self.pool.kind(),
                    tier,
                    kind: kind.id().to_string(),
                    retries: generator_retries,
                });
            };
            log::warn!(
                "pool={} generator retries exhausted at {tier}, stepping down to {lower}",
                self.pool.kind()
            );
            retries_at_tier = 0;
            (tier, upgrades) = self.fall_back(lower, upgrades)?;
        }
    }

    /// Steps 1 and 2: base tier plus luck escalation, clamped at Master.
    fn roll_tier(&self, view: PartyView<'_>, preset: u32, player: bool, rng: &mut dyn RewardRng) -> (Tier, u32) {
        let bands = &self.config.tier_bands;
        let value = rng.next_int(bands.roll_range, "Choosing a modifier tier");
        let mut upgrades = preset;
        if player && value != 0 {
            let luck = &self.config.luck;
            let odds = luck.upgrade_odds(view.effective_luck(luck.max_luck));
            while rng.next_int(odds, "Upgrade chance") < luck.upgrade_threshold {
                upgrades += 1;
            }
        }
        let base = bands.tier_for(value);
        let upgrades = upgrades.min(base.headroom());
        (base.raised(upgrades), upgrades)
    }

    /// Shiny-driven upgrades for a caller-pinned player tier. Climbs into
    /// any tier with entries, even one whose weights are all zero; the
    /// fallback settles it afterwards.
    fn roll_pinned_upgrades(&self, view: PartyView<'_>, tier: Tier, rng: &mut dyn RewardRng) -> (Tier, u32) {
        if tier >= Tier::Master {
            return (tier, 0);
        }
        let odds = self.config.luck.pinned_upgrade_odds(view.shiny_count());
        let mut current = tier;
        let mut upgrades = 0;
        while let Some(next) = current.higher().filter(|t| self.pool.has_entries(*t)) {
            if rng.next_int(odds, "Upgrade chance 2") != 0 {
                break;
            }
            current = next;
            upgrades += 1;
        }
        (current, upgrades)
    }

    /// Step down until a selectable tier is found.
    fn fall_back(&self, tier: Tier, upgrades: u32) -> RewardResult<(Tier, u32)> {
        if self.pool.is_empty() {
            return Err(RewardError::EmptyPool { pool: self.pool.kind() });
        }
        let requested = tier;
        let mut tier = tier;
        let mut upgrades = upgrades;
        while !self.is_available(tier) {
            match tier.lower() {
                Some(lower) => {
                    tier = lower;
                    upgrades = upgrades.saturating_sub(1);
                }
                None => {
                    return Err(RewardError::EmptyTier {
                        pool: self.pool.kind(),
                        tier: requested,
                    })
                }
            }
        }
        Ok((tier, upgrades))
    }
}
