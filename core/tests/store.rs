//! SQLite round-trips for the reward log and held modifiers.

use reward_pool_core::{
    config::EngineConfig,
    engine::RewardEngine,
    event::{RewardEvent, RewardLogEntry},
    ledger::{HeldStack, ModifierLedger},
    offers::OfferRequest,
    party::{BattlerSummary, RewardContext},
    session::RewardSession,
    store::RewardStore,
    types::Side,
};

// ── Test helpers ────────────────────────────────────────────

fn store_with_run(run_id: &str) -> RewardStore {
    let store = RewardStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_run(run_id, 7, "0.1.0-test").expect("insert run");
    store
}

// ── Tests ───────────────────────────────────────────────────

#[test]
fn reward_log_reads_back_in_insertion_order() {
    let store = store_with_run("run-a");
    for (screen, luck) in [(1, 3), (1, 4), (2, 5)] {
        let event = RewardEvent::PartyLuckComputed { screen, luck };
        store
            .append_reward(&RewardLogEntry {
                id: None,
                run_id: "run-a".to_string(),
                screen,
                event_type: event.event_type().to_string(),
                payload: serde_json::to_string(&event).expect("serialize"),
            })
            .expect("append");
    }

    let first_screen = store.rewards_for_screen("run-a", 1).expect("read");
    assert_eq!(first_screen.len(), 2);
    assert!(first_screen[0].id < first_screen[1].id);
    let decoded: RewardEvent = serde_json::from_str(&first_screen[1].payload).expect("decode");
    assert_eq!(decoded, RewardEvent::PartyLuckComputed { screen: 1, luck: 4 });

    assert_eq!(store.reward_log("run-a").expect("read").len(), 3);
    assert_eq!(store.run_seed("run-a").expect("seed"), Some(7));
    assert_eq!(store.run_seed("missing").expect("seed"), None);
}

#[test]
fn held_modifiers_upsert_and_load_into_a_ledger() {
    let store = store_with_run("run-b");
    store
        .upsert_held_modifier("run-b", Side::Player, "EXP_SHARE", HeldStack::global(1, 5))
        .expect("insert");
    store
        .upsert_held_modifier("run-b", Side::Player, "EXP_SHARE", HeldStack::global(5, 5))
        .expect("update");
    let held = HeldStack {
        holder: Some(3),
        stack_count: 2,
        max_stack: 4,
    };
    store
        .upsert_held_modifier("run-b", Side::Enemy, "LEFTOVERS", held)
        .expect("insert held");

    let ledger = store.load_ledger("run-b").expect("ledger");
    assert_eq!(ledger.stacks("EXP_SHARE", Side::Player), vec![HeldStack::global(5, 5)]);
    assert_eq!(ledger.stacks("LEFTOVERS", Side::Enemy), vec![held]);
    assert!(!ledger.holds("LEFTOVERS", Side::Player));
}

#[test]
fn session_logs_every_result() {
    let store = RewardStore::in_memory().expect("store");
    store.migrate().expect("migration");
    let engine = RewardEngine::new(EngineConfig::default_test()).expect("engine");
    let mut session = RewardSession::new("run-c".to_string(), 99, engine, store).expect("session");
    let party = vec![BattlerSummary::new(1, 1, 10)];
    let ctx = RewardContext::new(3);

    session.draw_offers(&party, &ctx, &OfferRequest::new(3)).expect("offers");
    session.reroll_offers(&party, &ctx, &OfferRequest::new(3)).expect("reroll");
    session.shop(3, 100).expect("shop");

    let types: Vec<String> = session
        .event_log()
        .expect("log")
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            "thresholds_rebuilt",
            "offers_drawn",
            "thresholds_rebuilt",
            "offers_drawn",
            "shop_offered",
        ]
    );
    assert_eq!(session.screen_index(), 1);
    assert_eq!(session.reroll_count(), 1);
}

/// A pickup recorded between screens caps the next rebuild.
#[test]
fn recorded_pickups_reach_the_next_screen() {
    let store = RewardStore::in_memory().expect("store");
    store.migrate().expect("migration");
    let engine = RewardEngine::new(EngineConfig::default_test()).expect("engine");
    let mut session = RewardSession::new("run-d".to_string(), 5, engine, store).expect("session");
    let party = vec![BattlerSummary::new(1, 1, 10)];
    let ctx = RewardContext::new(3);

    session
        .record_held_modifier(Side::Player, "RARE_CANDY", HeldStack::global(99, 99))
        .expect("record");
    for _ in 0..20 {
        let sheet = session.draw_offers(&party, &ctx, &OfferRequest::new(3)).expect("offers");
        assert!(sheet.items().all(|i| i.id != "RARE_CANDY"), "capped item offered");
    }
}
