//! Reward session: one run's seeded stream, screen counter and audit log.
//!
//! RULES:
//!   - All draws of a run come from one `SessionRng` in call order.
//!   - Every result handed out is persisted as a `RewardEvent` before
//!     it is returned.
//!   - Held modifiers are read back from the store on every call, so
//!     the caller records a pickup before the next screen.

use crate::{
    engine::{RewardEngine, RewardScreen},
    enemy::{BuffGrant, EnemyDrop, ExistingBuff, StarterGrant},
    error::RewardResult,
    event::{RewardEvent, RewardLogEntry},
    ledger::HeldStack,
    offers::{OfferRequest, OfferSheet, RewardOffer},
    party::{BattlerSummary, PartyView, RewardContext},
    rng::{SessionRng, StreamSlot},
    store::RewardStore,
    types::{PoolKind, RunId, ScreenIndex, Side, Tier},
};

pub struct RewardSession {
    pub run_id: RunId,
    engine: RewardEngine,
    rng: SessionRng,
    store: RewardStore,
    screen: RewardScreen,
    screen_index: ScreenIndex,
    reroll_count: u32,
}

impl RewardSession {
    pub fn new(run_id: RunId, seed: u64, engine: RewardEngine, store: RewardStore) -> RewardResult<Self> {
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        log::info!("reward session {run_id} started with seed {seed}");
        Ok(Self {
            run_id,
            engine,
            rng: SessionRng::new(seed, StreamSlot::Rewards),
            store,
            screen: RewardScreen::new(),
            screen_index: 0,
            reroll_count: 0,
        })
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    pub fn store(&self) -> &RewardStore {
        &self.store
    }

    pub fn screen_index(&self) -> ScreenIndex {
        self.screen_index
    }

    pub fn reroll_count(&self) -> u32 {
        self.reroll_count
    }

    /// Values consumed from the reward stream so far.
    pub fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    // ── Player screens ─────────────────────────────────────────

    /// Open a new reward screen and draw its offers.
    pub fn draw_offers(
        &mut self,
        party: &[BattlerSummary],
        ctx: &RewardContext,
        request: &OfferRequest,
    ) -> RewardResult<OfferSheet> {
        self.screen_index += 1;
        self.reroll_count = 0;
        self.screen.clear();
        self.draw_screen(party, ctx, request)
    }

    /// Redraw the current screen with one more reroll on the counter.
    pub fn reroll_offers(
        &mut self,
        party: &[BattlerSummary],
        ctx: &RewardContext,
        request: &OfferRequest,
    ) -> RewardResult<OfferSheet> {
        self.reroll_count += 1;
        self.draw_screen(party, ctx, request)
    }

    fn draw_screen(
        &mut self,
        party: &[BattlerSummary],
        ctx: &RewardContext,
        request: &OfferRequest,
    ) -> RewardResult<OfferSheet> {
        let ledger = self.store.load_ledger(&self.run_id)?;
        let view = PartyView::new(party, ctx, &ledger);
        self.rebuild(PoolKind::Player, view)?;
        let (sheet, failure) =
            self.engine
                .draw_player_offers_or_default(&self.screen, view, request, &mut self.rng)?;
        let event = match failure {
            None => RewardEvent::OffersDrawn {
                screen: self.screen_index,
                reroll_count: self.reroll_count,
                offers: sheet.offers.clone(),
                retries: sheet.retries,
                exhausted_slots: sheet.exhausted_slots.clone(),
            },
            Some(err) => RewardEvent::DefaultOfferUsed {
                screen: self.screen_index,
                reason: err.to_string(),
                offers: sheet.offers.clone(),
            },
        };
        self.record(&event)?;
        Ok(sheet)
    }

    // ── Opponent rewards ───────────────────────────────────────

    /// Held-item drops from a wild or trainer opponent. Switching
    /// encounter kind discards the other pool's tables.
    pub fn enemy_drops(
        &mut self,
        pool: PoolKind,
        party: &[BattlerSummary],
        ctx: &RewardContext,
        count: usize,
        upgrade_chance: u32,
    ) -> RewardResult<Vec<EnemyDrop>> {
        let other = match pool {
            PoolKind::Wild => Some(PoolKind::Trainer),
            PoolKind::Trainer => Some(PoolKind::Wild),
            _ => None,
        };
        if let Some(other) = other {
            self.screen.discard(other);
        }
        let ledger = self.store.load_ledger(&self.run_id)?;
        let view = PartyView::new(party, ctx, &ledger);
        self.rebuild(pool, view)?;
        let drops = self
            .engine
            .draw_enemy_drops(&self.screen, pool, view, count, upgrade_chance, &mut self.rng)?;
        self.record(&RewardEvent::EnemyDropsDrawn {
            screen: self.screen_index,
            pool,
            drops: drops.clone(),
        })?;
        Ok(drops)
    }

    pub fn enemy_buff(
        &mut self,
        tier: Tier,
        existing: &[ExistingBuff],
        party: &[BattlerSummary],
        ctx: &RewardContext,
    ) -> RewardResult<BuffGrant> {
        let ledger = self.store.load_ledger(&self.run_id)?;
        let view = PartyView::new(party, ctx, &ledger);
        self.rebuild(PoolKind::EnemyBuff, view)?;
        let grant = self
            .engine
            .draw_enemy_buff(&self.screen, tier, existing, view, &mut self.rng)?;
        self.record(&RewardEvent::EnemyBuffGranted {
            screen: self.screen_index,
            grant: grant.clone(),
        })?;
        Ok(grant)
    }

    pub fn daily_starter_kit(
        &mut self,
        party: &[BattlerSummary],
        ctx: &RewardContext,
    ) -> RewardResult<Vec<StarterGrant>> {
        let ledger = self.store.load_ledger(&self.run_id)?;
        let view = PartyView::new(party, ctx, &ledger);
        self.rebuild(PoolKind::DailyStarter, view)?;
        let grants = self
            .engine
            .draw_daily_starter_kit(&self.screen, view, &mut self.rng)?;
        self.record(&RewardEvent::DailyStarterGranted {
            screen: self.screen_index,
            grants: grants.clone(),
        })?;
        Ok(grants)
    }

    // ── No-RNG queries ─────────────────────────────────────────

    pub fn shop(&mut self, wave: u32, base_cost: u32) -> RewardResult<Vec<RewardOffer>> {
        let offers = self.engine.shop_offers_for_wave(wave, base_cost)?;
        self.record(&RewardEvent::ShopOffered {
            screen: self.screen_index,
            wave,
            offers: offers.clone(),
        })?;
        Ok(offers)
    }

    pub fn luck(&mut self, party: &[BattlerSummary]) -> RewardResult<u32> {
        let luck = self.engine.compute_party_luck(party);
        self.record(&RewardEvent::PartyLuckComputed {
            screen: self.screen_index,
            luck,
        })?;
        Ok(luck)
    }

    // ── Ledger and log ─────────────────────────────────────────

    pub fn record_held_modifier(&self, side: Side, item_id: &str, stack: HeldStack) -> RewardResult<()> {
        self.store.upsert_held_modifier(&self.run_id, side, item_id, stack)
    }

    pub fn event_log(&self) -> RewardResult<Vec<RewardLogEntry>> {
        self.store.reward_log(&self.run_id)
    }

    fn rebuild(&mut self, pool: PoolKind, view: PartyView<'_>) -> RewardResult<()> {
        let thresholds = self
            .engine
            .rebuild_thresholds(&mut self.screen, pool, view, self.reroll_count)?;
        let event = RewardEvent::ThresholdsRebuilt {
            screen: self.screen_index,
            pool,
            reroll_count: thresholds.reroll_count,
            totals: thresholds.tiers.iter().map(|(tier, t)| (*tier, t.total)).collect(),
        };
        self.record(&event)
    }

    fn record(&self, event: &RewardEvent) -> RewardResult<()> {
        let entry = RewardLogEntry {
            id: None,
            run_id: self.run_id.clone(),
            screen: self.screen_index,
            event_type: event.event_type().to_string(),
            payload: serde_json::to_string(event)?,
        };
        self.store.append_reward(&entry)
    }
}
