//! The reward engine: static tables plus the draw operations.
//!
//! SCREEN LIFECYCLE (fixed, callers must follow it):
//!   1. `rebuild_thresholds` for every pool the screen will draw from.
//!   2. Any number of draws against that `RewardScreen`.
//!   3. `discard` a pool once it no longer applies (wild → trainer).
//!
//! RULES:
//!   - The engine owns no randomness and no mutable state. Every draw
//!     takes the caller's `RewardRng` and `RewardScreen`.
//!   - Pools, the catalog and the tier index are built once and never
//!     mutated afterwards.
//!   - A draw from a pool whose thresholds were not rebuilt is an error,
//!     never a silent rebuild.

use crate::{
    catalog::Catalog,
    config::EngineConfig,
    enemy::{self, BuffGrant, EnemyDrop, ExistingBuff, StarterGrant},
    error::{RewardError, RewardResult},
    item::ItemKind,
    offers::{self, OfferRequest, OfferSheet, RewardOffer},
    party::{self, BattlerSummary, PartyView},
    pools::{PoolSet, TierIndex},
    rng::RewardRng,
    selector::Selector,
    shop,
    thresholds::{build_thresholds, odds_report, OddsLine, PoolThresholds},
    types::{PoolKind, Tier},
};
use std::collections::BTreeMap;

/// Per-pool threshold tables for the reward screen in progress.
#[derive(Debug, Clone, Default)]
pub struct RewardScreen {
    tables: BTreeMap<PoolKind, PoolThresholds>,
}

impl RewardScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, thresholds: PoolThresholds) {
        self.tables.insert(thresholds.pool, thresholds);
    }

    /// Drop a pool's tables; the next draw from it must rebuild first.
    pub fn discard(&mut self, pool: PoolKind) -> Option<PoolThresholds> {
        self.tables.remove(&pool)
    }

    pub fn thresholds(&self, pool: PoolKind) -> Option<&PoolThresholds> {
        self.tables.get(&pool)
    }

    pub fn require(&self, pool: PoolKind) -> RewardResult<&PoolThresholds> {
        self.thresholds(pool).ok_or(RewardError::ThresholdsNotBuilt { pool })
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

pub struct RewardEngine {
    config: EngineConfig,
    catalog: Catalog,
    pools: PoolSet,
    tier_index: TierIndex,
}

impl RewardEngine {
    /// The standard catalog and pools under `config`.
    pub fn new(config: EngineConfig) -> RewardResult<Self> {
        Self::with_parts(config, Catalog::standard(), PoolSet::standard())
    }

    /// Validate and wire custom tables.
    pub fn with_parts(config: EngineConfig, catalog: Catalog, pools: PoolSet) -> RewardResult<Self> {
        config
            .validate()
            .map_err(|e| RewardError::InvalidConfig(e.to_string()))?;
        pools.validate_against(&catalog)?;
        let tier_index = TierIndex::build(&pools);
        log::debug!("reward engine ready: {} item kinds", catalog.len());
        Ok(Self {
            config,
            catalog,
            pools,
            tier_index,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pools(&self) -> &PoolSet {
        &self.pools
    }

    pub fn tier_index(&self) -> &TierIndex {
        &self.tier_index
    }

    // ── Thresholds ─────────────────────────────────────────────

    /// Rebuild `pool`'s tables for this screen. Idempotent for
    /// identical inputs; draws nothing.
    pub fn rebuild_thresholds<'s>(
        &self,
        screen: &'s mut RewardScreen,
        pool: PoolKind,
        view: PartyView<'_>,
        reroll_count: u32,
    ) -> RewardResult<&'s PoolThresholds> {
        let thresholds = build_thresholds(self.pools.get(pool), &self.catalog, view, reroll_count, &self.config)?;
        log::debug!(
            "rebuilt {pool} thresholds (reroll {reroll_count}): {:?}",
            thresholds
                .tiers
                .iter()
                .map(|(tier, t)| (tier.name(), t.total))
                .collect::<Vec<_>>()
        );
        if self.config.log_odds_table {
            for line in self.odds_report(&thresholds) {
                log::debug!(
                    "{pool} {} {}: weight {} ({}% of tier, {}% overall)",
                    line.tier,
                    line.kind_id,
                    line.weight,
                    line.tier_percent,
                    line.total_percent
                );
            }
        }
        screen.insert(thresholds);
        screen.require(pool)
    }

    pub fn odds_report(&self, thresholds: &PoolThresholds) -> Vec<OddsLine> {
        odds_report(
            self.pools.get(thresholds.pool),
            thresholds,
            &self.config.tier_bands,
            self.config.use_max_weight_for_output,
        )
    }

    fn selector<'a>(&'a self, screen: &'a RewardScreen, pool: PoolKind) -> RewardResult<Selector<'a>> {
        Ok(Selector::new(
            self.pools.get(pool),
            screen.require(pool)?,
            &self.catalog,
            &self.config,
        ))
    }

    // ── Player rewards ─────────────────────────────────────────

    pub fn draw_player_offers(
        &self,
        screen: &RewardScreen,
        view: PartyView<'_>,
        request: &OfferRequest,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<OfferSheet> {
        let selector = self.selector(screen, PoolKind::Player)?;
        let sheet = offers::assemble_offers(&selector, &self.tier_index, view, request, rng)?;
        for (slot, offer) in sheet.offers.iter().enumerate() {
            log::info!(
                "offer {slot}: {} [{}] +{}{}",
                offer.item.name,
                offer.tier,
                offer.upgrade_count,
                if offer.overridden { " (override)" } else { "" }
            );
        }
        Ok(sheet)
    }

    /// `draw_player_offers`, degrading to the safe default set when
    /// generation fails. The error is returned alongside for auditing.
    pub fn draw_player_offers_or_default(
        &self,
        screen: &RewardScreen,
        view: PartyView<'_>,
        request: &OfferRequest,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<(OfferSheet, Option<RewardError>)> {
        match self.draw_player_offers(screen, view, request, rng) {
            Ok(sheet) => Ok((sheet, None)),
            Err(err) => {
                log::error!("reward generation failed, using safe default offers: {err}");
                let sheet = OfferSheet {
                    offers: self.default_offers(request.count)?,
                    ..OfferSheet::default()
                };
                Ok((sheet, Some(err)))
            }
        }
    }

    /// `count` copies of the first Common entry of the Player pool.
    pub fn default_offers(&self, count: usize) -> RewardResult<Vec<RewardOffer>> {
        let pool = self.pools.get(PoolKind::Player);
        let entry = pool
            .entries(Tier::Common)
            .first()
            .ok_or(RewardError::EmptyTier {
                pool: PoolKind::Player,
                tier: Tier::Common,
            })?;
        let item = match self.catalog.require(entry.kind_id)? {
            ItemKind::Fixed(item) => item.clone(),
            other => {
                return Err(RewardError::InvalidConfig(format!(
                    "safe default '{}' must be a fixed item",
                    other.id()
                )))
            }
        };
        Ok((0..count)
            .map(|_| RewardOffer {
                item: item.clone(),
                tier: Tier::Common,
                upgrade_count: 0,
                cost: 0,
                overridden: false,
            })
            .collect())
    }

    // ── Opponent rewards ───────────────────────────────────────

    pub fn draw_enemy_drop(
        &self,
        screen: &RewardScreen,
        pool: PoolKind,
        view: PartyView<'_>,
        upgrade_chance: u32,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<EnemyDrop> {
        let selector = self.selector(screen, pool)?;
        enemy::draw_enemy_drop(&selector, view, upgrade_chance, rng)
    }

    pub fn draw_enemy_drops(
        &self,
        screen: &RewardScreen,
        pool: PoolKind,
        view: PartyView<'_>,
        count: usize,
        upgrade_chance: u32,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<Vec<EnemyDrop>> {
        let selector = self.selector(screen, pool)?;
        enemy::draw_enemy_drops(&selector, view, count, upgrade_chance, rng)
    }

    pub fn draw_enemy_buff(
        &self,
        screen: &RewardScreen,
        tier: Tier,
        existing: &[ExistingBuff],
        view: PartyView<'_>,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<BuffGrant> {
        let selector = self.selector(screen, PoolKind::EnemyBuff)?;
        enemy::draw_enemy_buff(&selector, view, tier, existing, rng)
    }

    pub fn draw_daily_starter_kit(
        &self,
        screen: &RewardScreen,
        view: PartyView<'_>,
        rng: &mut dyn RewardRng,
    ) -> RewardResult<Vec<StarterGrant>> {
        let selector = self.selector(screen, PoolKind::DailyStarter)?;
        enemy::draw_daily_starter_kit(&selector, view, rng)
    }

    // ── No-RNG helpers ─────────────────────────────────────────

    pub fn compute_party_luck(&self, party: &[BattlerSummary]) -> u32 {
        party::party_luck(party, self.config.luck.max_luck)
    }

    pub fn shop_offers_for_wave(&self, wave: u32, base_cost: u32) -> RewardResult<Vec<RewardOffer>> {
        shop::shop_offers_for_wave(wave, base_cost, &self.catalog, &self.tier_index, &self.config)
    }

    /// Tier of an item kind as seen from `pool`.
    pub fn infer_tier(&self, kind_id: &str, pool: PoolKind) -> Option<Tier> {
        self.tier_index.infer(kind_id, pool)
    }
}
