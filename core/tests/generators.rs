//! Generator candidate lists and the one-draw resolution rule.

use reward_pool_core::{
    catalog::Catalog,
    generators::{MEGA_ACCESS_ITEM, TERA_ACCESS_ITEM},
    item::{BerryType, Generator, ItemVariant, SpeciesBooster},
    ledger::{HeldStack, InMemoryLedger},
    party::{
        BattlerSummary, FormAccess, FormChangeOption, HeldItem, MoveSummary, PartyView, RewardContext,
        TmOption,
    },
    rng::{RecordingRng, ScriptedRng},
    types::{MoveCategory, PokemonType, Side, Tier},
};

// ── Test helpers ────────────────────────────────────────────

fn attacker() -> BattlerSummary {
    let mut m = BattlerSummary::new(1, 6, 36);
    m.moves = vec![
        MoveSummary::new(52, PokemonType::Fire, MoveCategory::Special, 25),
        MoveSummary::new(53, PokemonType::Fire, MoveCategory::Special, 15),
        MoveSummary::new(55, PokemonType::Water, MoveCategory::Special, 25),
        MoveSummary::new(57, PokemonType::Water, MoveCategory::Special, 15),
        MoveSummary::new(56, PokemonType::Water, MoveCategory::Special, 5),
        MoveSummary::new(352, PokemonType::Water, MoveCategory::Physical, 15),
        MoveSummary::new(73, PokemonType::Grass, MoveCategory::Status, 10),
    ];
    m
}

fn weights_of(candidates: &[(ItemVariant, u32)]) -> Vec<u32> {
    candidates.iter().map(|(_, w)| *w).collect()
}

// ── Tests ───────────────────────────────────────────────────

/// One point per damaging move, three at most per type, first-seen
/// order; status moves do not count.
#[test]
fn attack_type_weights_cap_at_three() {
    let party = vec![attacker()];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);

    let candidates = Generator::AttackTypeBooster.candidates(view);
    assert_eq!(
        candidates,
        vec![
            (ItemVariant::AttackType { move_type: PokemonType::Fire }, 2),
            (ItemVariant::AttackType { move_type: PokemonType::Water }, 3),
        ]
    );
}

#[test]
fn attack_type_booster_needs_a_damaging_move() {
    let party = vec![BattlerSummary::new(1, 1, 5)];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    assert!(!Generator::AttackTypeBooster.is_applicable(view));

    let mut rng = ScriptedRng::new(vec![]);
    assert_eq!(Generator::AttackTypeBooster.generate(view, None, &mut rng), None);
    assert_eq!(rng.consumed(), 0, "an empty candidate list draws nothing");
}

/// Resolution consumes exactly one draw however many candidates exist.
#[test]
fn each_resolution_draws_once() {
    let party = vec![attacker()];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);

    for generator in [
        Generator::AttackTypeBooster,
        Generator::BaseStatBooster,
        Generator::TempStatBooster,
        Generator::Mint,
        Generator::Berry,
    ] {
        let mut rng = RecordingRng::new(ScriptedRng::new(vec![7]));
        assert!(generator.generate(view, None, &mut rng).is_some(), "{generator:?}");
        assert_eq!(rng.records().len(), 1, "{generator:?} drew more than once");
    }
}

#[test]
fn pinned_arguments_skip_the_rng() {
    let party = vec![attacker()];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let pinned = ItemVariant::Berry { berry: BerryType::Starf };

    let mut rng = ScriptedRng::new(vec![]);
    assert_eq!(Generator::Berry.generate(view, Some(&pinned), &mut rng), Some(pinned));
    assert_eq!(rng.consumed(), 0);
}

/// Sitrus, Lum and Leppa split half the weight; eight pinch berries share
/// the rest.
#[test]
fn berry_odds_favour_the_healing_berries() {
    let party = vec![attacker()];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);

    let weights = weights_of(&Generator::Berry.candidates(view));
    assert_eq!(weights.len(), 11);
    assert_eq!(weights.iter().sum::<u32>(), 96);
    assert_eq!(&weights[..3], &[16, 16, 16]);

    let mut rng = ScriptedRng::new(vec![95]);
    assert_eq!(
        Generator::Berry.generate(view, None, &mut rng),
        Some(ItemVariant::Berry { berry: BerryType::Starf })
    );
}

/// Tera shards need the Tera Orb. With one party type, that type is
/// picked 1152 of 3456, Stellar 36 and each of the 18 types 126.
#[test]
fn tera_shards_are_gated_and_favour_party_types() {
    let party = vec![BattlerSummary::new(1, 1, 5)];
    let ctx = RewardContext::new(10);
    let locked = InMemoryLedger::new();
    assert!(!Generator::TeraShard.is_applicable(PartyView::new(&party, &ctx, &locked)));

    let unlocked = InMemoryLedger::new().with(Side::Player, TERA_ACCESS_ITEM, HeldStack::global(1, 1));
    let view = PartyView::new(&party, &ctx, &unlocked);
    let candidates = Generator::TeraShard.candidates(view);
    let weights = weights_of(&candidates);
    assert_eq!(weights.len(), 1 + 1 + 18);
    assert_eq!(weights[0], 1152);
    assert_eq!(weights[1], 36);
    assert_eq!(weights.iter().sum::<u32>(), 1152 + 36 + 18 * 126);
    assert_eq!(candidates[0].0, ItemVariant::TeraShard { tera_type: PokemonType::Normal });
    assert_eq!(candidates[1].0, ItemVariant::TeraShard { tera_type: PokemonType::Stellar });
}

#[test]
fn species_boosters_skip_items_already_held() {
    let pikachu = BattlerSummary::new(1, 25, 20);
    let mut ditto = BattlerSummary::new(2, 132, 20);
    ditto.held_items.push(HeldItem {
        item_id: "METAL_POWDER".to_string(),
        stack_count: 1,
        max_stack: 1,
    });
    let party = vec![pikachu, ditto];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);

    let offered: Vec<_> = Generator::SpeciesStatBooster
        .candidates(view)
        .into_iter()
        .map(|(v, _)| v)
        .collect();
    assert_eq!(
        offered,
        vec![
            ItemVariant::SpeciesBooster { item: SpeciesBooster::LightBall },
            ItemVariant::SpeciesBooster { item: SpeciesBooster::QuickPowder },
        ]
    );
}

#[test]
fn tms_are_filtered_by_tier_and_known_moves() {
    let mut member = attacker();
    member.compatible_tms = vec![
        TmOption { move_id: 53, name: "Flamethrower".to_string(), tier: Tier::Common },
        TmOption { move_id: 89, name: "Earthquake".to_string(), tier: Tier::Common },
        TmOption { move_id: 94, name: "Psychic".to_string(), tier: Tier::Ultra },
        TmOption { move_id: 200, name: "Outrage (N)".to_string(), tier: Tier::Common },
    ];
    let party = vec![member];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);

    let common = Generator::Tm(Tier::Common).candidates(view);
    assert_eq!(common.len(), 1);
    assert!(matches!(&common[0].0, ItemVariant::Tm { move_id: 89, .. }));
    assert_eq!(Generator::Tm(Tier::Ultra).candidates(view).len(), 1);
    assert!(!Generator::Tm(Tier::Great).is_applicable(view));
}

#[test]
fn mega_forms_need_the_bracelet() {
    let mut member = BattlerSummary::new(1, 6, 50);
    member.form_change_items = vec![FormChangeOption {
        item_id: 20,
        name: "Charizardite X".to_string(),
        access: FormAccess::Mega,
        already_held: false,
    }];
    let party = vec![member];
    let ctx = RewardContext::new(60);
    let rare = Generator::FormChangeItem { rare: true };

    let without = InMemoryLedger::new();
    assert!(!rare.is_applicable(PartyView::new(&party, &ctx, &without)));

    let with = InMemoryLedger::new().with(Side::Player, MEGA_ACCESS_ITEM, HeldStack::global(1, 1));
    assert!(rare.is_applicable(PartyView::new(&party, &ctx, &with)));
    assert!(!Generator::FormChangeItem { rare: false }.is_applicable(PartyView::new(&party, &ctx, &with)));
}

#[test]
fn catalog_resolves_fixed_items_without_drawing() {
    let catalog = Catalog::standard();
    let party = vec![attacker()];
    let ctx = RewardContext::new(10);
    let ledger = InMemoryLedger::new();
    let view = PartyView::new(&party, &ctx, &ledger);
    let mut rng = ScriptedRng::new(vec![]);

    let kind = catalog.require("LEFTOVERS").expect("registered");
    let item = catalog.resolve(kind, view, None, &mut rng).expect("fixed item");
    assert_eq!(item.name, "Leftovers");
    assert_eq!(rng.consumed(), 0);
}
