//! Enemy drops and enemy buffs.

use reward_pool_core::{
    config::EngineConfig,
    enemy::{ExistingBuff, MINI_BLACK_HOLE},
    engine::{RewardEngine, RewardScreen},
    error::RewardError,
    ledger::InMemoryLedger,
    party::{BattlerSummary, MoveSummary, PartyView, RewardContext},
    rng::{ScriptedRng, SessionRng, StreamSlot},
    types::{MoveCategory, PokemonType, PoolKind, Tier},
};

// ── Test helpers ────────────────────────────────────────────

fn engine() -> RewardEngine {
    RewardEngine::new(EngineConfig::default_test()).expect("engine")
}

fn party() -> Vec<BattlerSummary> {
    let mut lead = BattlerSummary::new(1, 9, 40);
    lead.moves = vec![MoveSummary::new(57, PokemonType::Water, MoveCategory::Special, 15)];
    vec![lead]
}

fn screen_for(engine: &RewardEngine, pool: PoolKind, view: PartyView<'_>) -> RewardScreen {
    let mut screen = RewardScreen::new();
    engine.rebuild_thresholds(&mut screen, pool, view, 0).expect("rebuild");
    screen
}

fn existing(item_id: &str, stack_count: u32, max_stack: u32) -> ExistingBuff {
    ExistingBuff {
        item_id: item_id.to_string(),
        stack_count,
        max_stack,
    }
}

// ── Drops ───────────────────────────────────────────────────

/// The upgrade roll comes first; a hit lifts a Common roll to Great.
#[test]
fn upgrade_chance_is_drawn_before_the_tier() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::Wild, view);

    let mut rng = ScriptedRng::new(vec![0, 800, 0, 0]);
    let drop = engine
        .draw_enemy_drop(&screen, PoolKind::Wild, view, 4, &mut rng)
        .expect("drop");

    assert_eq!(drop.tier, Tier::Great);
    assert_eq!(drop.upgrade_count, 1);
    assert_eq!(drop.item.id, "BASE_STAT_BOOSTER");
    let labels: Vec<_> = rng.draws().iter().map(|d| d.label).collect();
    assert_eq!(
        labels,
        vec![
            "Chance to upgrade an opponent's item",
            "Choosing a modifier tier",
            "Weighted modifier selection",
            "Choosing a vitamin",
        ]
    );
}

#[test]
fn missed_upgrade_chance_leaves_the_roll_alone() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::Trainer, view);

    let mut rng = ScriptedRng::new(vec![3, 800, 0, 0]);
    let drop = engine
        .draw_enemy_drop(&screen, PoolKind::Trainer, view, 4, &mut rng)
        .expect("drop");
    assert_eq!(drop.tier, Tier::Common);
    assert_eq!(drop.upgrade_count, 0);
}

#[test]
fn mini_black_hole_joins_drops_on_the_thousandth_wave() {
    let engine = engine();
    let party = party();
    let ledger = InMemoryLedger::new();
    let mut rng = SessionRng::new(3, StreamSlot::Rewards);

    for (wave, expected) in [(999, 2), (1000, 3), (2000, 3)] {
        let ctx = RewardContext::new(wave);
        let view = PartyView::new(&party, &ctx, &ledger);
        let screen = screen_for(&engine, PoolKind::Wild, view);
        let drops = engine
            .draw_enemy_drops(&screen, PoolKind::Wild, view, 2, 0, &mut rng)
            .expect("drops");
        assert_eq!(drops.len(), expected, "wave {wave}");
        let has_hole = drops.iter().any(|d| d.item.id == MINI_BLACK_HOLE);
        assert_eq!(has_hole, expected == 3, "wave {wave}");
    }
}

#[test]
fn drops_from_the_player_pool_are_rejected() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::Player, view);
    let mut rng = ScriptedRng::new(vec![]);

    let err = engine
        .draw_enemy_drop(&screen, PoolKind::Player, view, 0, &mut rng)
        .expect_err("wrong pool");
    assert!(matches!(err, RewardError::WrongPool { pool: PoolKind::Player, .. }));
    assert_eq!(rng.consumed(), 0);
}

// ── Buffs ───────────────────────────────────────────────────

#[test]
fn buff_stack_size_follows_the_requested_tier() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::EnemyBuff, view);
    let mut rng = SessionRng::new(8, StreamSlot::Rewards);

    for (tier, stack) in [
        (Tier::Ultra, 5),
        (Tier::Great, 3),
        (Tier::Common, 1),
        (Tier::Rogue, 1),
        (Tier::Master, 1),
    ] {
        let grant = engine
            .draw_enemy_buff(&screen, tier, &[], view, &mut rng)
            .expect("buff");
        assert_eq!(grant.stack_count, stack, "{tier}");
        assert_eq!(grant.retries, 0);
        assert!(grant.tier <= Tier::Ultra, "empty upper tiers fall back to Ultra");
    }
}

/// Ultra weights are 10/10/10/10/10/5. A full Damage Token is skipped
/// in favour of the next roll.
#[test]
fn full_buff_is_redrawn() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::EnemyBuff, view);

    let held = [existing("ENEMY_DAMAGE_BOOSTER", 5, 5)];
    let mut rng = ScriptedRng::new(vec![0, 10]);
    let grant = engine
        .draw_enemy_buff(&screen, Tier::Ultra, &held, view, &mut rng)
        .expect("buff");

    assert_eq!(grant.item.id, "ENEMY_DAMAGE_REDUCTION");
    assert_eq!(grant.retries, 1);
    assert_eq!(grant.stack_count, 5);
    assert_eq!(rng.consumed(), 2, "pinned buff tiers roll no tier or luck");
}

/// A buff with room for the whole grant is kept on the first draw.
#[test]
fn buff_with_room_is_kept() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::EnemyBuff, view);

    let held = [existing("ENEMY_DAMAGE_BOOSTER", 2, 10)];
    let mut rng = ScriptedRng::new(vec![0]);
    let grant = engine
        .draw_enemy_buff(&screen, Tier::Great, &held, view, &mut rng)
        .expect("buff");
    assert_eq!(grant.item.id, "ENEMY_DAMAGE_BOOSTER");
    assert_eq!(grant.retries, 0);
}

/// When every candidate is full the loop gives up after 49 redraws and
/// grants the last draw anyway.
#[test]
fn buff_redraws_stop_at_the_cap() {
    let engine = engine();
    let party = party();
    let ctx = RewardContext::new(15);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let screen = screen_for(&engine, PoolKind::EnemyBuff, view);

    let held: Vec<_> = [
        "ENEMY_DAMAGE_BOOSTER",
        "ENEMY_DAMAGE_REDUCTION",
        "ENEMY_HEAL",
        "ENEMY_STATUS_EFFECT_HEAL_CHANCE",
        "ENEMY_ENDURE_CHANCE",
        "ENEMY_FUSED_CHANCE",
    ]
    .into_iter()
    .map(|id| existing(id, 5, 5))
    .collect();
    let mut rng = SessionRng::new(21, StreamSlot::Rewards);
    let grant = engine
        .draw_enemy_buff(&screen, Tier::Ultra, &held, view, &mut rng)
        .expect("buff");
    assert_eq!(grant.retries, 49);
    assert_eq!(rng.draws(), 50);
}
