//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two sessions, same seed, same calls.
//! They must produce byte-identical reward logs.
//! Any divergence breaks save/replay. Do not merge until fixed.

use reward_pool_core::{
    config::EngineConfig,
    enemy::ExistingBuff,
    engine::RewardEngine,
    offers::OfferRequest,
    party::{BattlerSummary, MoveSummary, RewardContext},
    session::RewardSession,
    store::RewardStore,
    types::{MoveCategory, PokemonType, PoolKind, Tier},
};

// ── Test helpers ────────────────────────────────────────────

fn build_session(seed: u64) -> RewardSession {
    let store = RewardStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let engine = RewardEngine::new(EngineConfig::default_test()).expect("engine");
    RewardSession::new(format!("det-test-{seed}"), seed, engine, store).expect("session")
}

fn party() -> Vec<BattlerSummary> {
    let mut lead = BattlerSummary::new(1, 25, 30);
    lead.hp = 40;
    lead.shiny = true;
    lead.luck = 3;
    lead.moves = vec![
        MoveSummary::new(85, PokemonType::Electric, MoveCategory::Special, 15),
        MoveSummary::new(98, PokemonType::Normal, MoveCategory::Physical, 30),
    ];
    let mut second = BattlerSummary::new(2, 6, 32);
    second.types = vec![PokemonType::Fire, PokemonType::Flying];
    second.moves = vec![MoveSummary::new(53, PokemonType::Fire, MoveCategory::Special, 15)];
    vec![lead, second]
}

/// A representative run: screens, rerolls, enemy rewards and the shop.
fn play(session: &mut RewardSession) {
    let party = party();
    for wave in 1..=40u32 {
        let ctx = RewardContext::new(wave);
        session
            .draw_offers(&party, &ctx, &OfferRequest::new(3))
            .expect("offers");
        if wave % 5 == 0 {
            session
                .reroll_offers(&party, &ctx, &OfferRequest::new(3))
                .expect("reroll");
        }
        let pool = if wave % 2 == 0 { PoolKind::Trainer } else { PoolKind::Wild };
        session.enemy_drops(pool, &party, &ctx, 2, 8).expect("drops");
        session
            .enemy_buff(Tier::Great, &Vec::<ExistingBuff>::new(), &party, &ctx)
            .expect("buff");
        session.shop(wave, 200).expect("shop");
    }
}

fn payloads(session: &RewardSession) -> Vec<String> {
    session
        .event_log()
        .expect("read log")
        .into_iter()
        .map(|e| e.payload)
        .collect()
}

// ── Tests ───────────────────────────────────────────────────

#[test]
fn same_seed_produces_identical_reward_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let mut session_a = build_session(SEED);
    let mut session_b = build_session(SEED);
    play(&mut session_a);
    play(&mut session_b);

    let log_a = payloads(&session_a);
    let log_b = payloads(&session_b);

    assert_eq!(
        log_a.len(), log_b.len(),
        "Reward log lengths differ: {} vs {}",
        log_a.len(), log_b.len()
    );
    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Reward log diverged at entry {i}:\n  A: {a}\n  B: {b}");
    }
    assert_eq!(session_a.rng_draws(), session_b.rng_draws(), "draw counts differ");
}

#[test]
fn different_seeds_produce_different_logs() {
    let mut session_a = build_session(42);
    let mut session_b = build_session(99);
    play(&mut session_a);
    play(&mut session_b);

    let log_a = payloads(&session_a);
    let log_b = payloads(&session_b);
    let any_different = log_a.iter().zip(log_b.iter()).any(|(a, b)| a != b);
    assert!(any_different, "Different seeds produced identical logs; seed is not being used");
}
