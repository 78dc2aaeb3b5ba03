//! Registry of every obtainable item kind.

use crate::{
    error::{RewardError, RewardResult},
    item::{ConcreteItem, Generator, ItemClass, ItemKind, ItemVariant},
    party::PartyView,
    rng::RewardRng,
    types::Tier,
};
use std::collections::BTreeMap;

use crate::item::ItemClass::{EnemyBuff, FormChange, Global, HeldItem, PokemonTargeted};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    kinds: BTreeMap<String, ItemKind>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a kind. A later registration under the same id replaces
    /// the earlier one.
    pub fn register(&mut self, kind: ItemKind) -> &mut Self {
        self.kinds.insert(kind.id().to_string(), kind);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ItemKind> {
        self.kinds.get(id)
    }

    pub fn require(&self, id: &str) -> RewardResult<&ItemKind> {
        self.get(id).ok_or_else(|| RewardError::UnknownItemKind { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Identity for fixed kinds; one generator resolution otherwise.
    /// `None` when a generator has nothing to offer this party.
    pub fn resolve(
        &self,
        kind: &ItemKind,
        view: PartyView<'_>,
        pinned: Option<&ItemVariant>,
        rng: &mut dyn RewardRng,
    ) -> Option<ConcreteItem> {
        match kind {
            ItemKind::Fixed(item) => Some(item.clone()),
            ItemKind::Generator { generator, .. } => generator
                .generate(view, pinned, rng)
                .map(|variant| kind.materialize(variant)),
        }
    }

    /// The full item registry.
    pub fn standard() -> Self {
        let mut c = Self::empty();
        for (id, name, group, class) in FIXED_ITEMS {
            c.register(ItemKind::fixed(id, name, *group, *class));
        }
        for (id, name, group, class, generator) in generated_items() {
            c.register(ItemKind::Generator {
                id,
                name,
                group,
                class,
                generator,
            });
        }
        c
    }
}

type FixedRow = (&'static str, &'static str, Option<&'static str>, ItemClass);

const FIXED_ITEMS: &[FixedRow] = &[
    // ── Poké balls ─────────────────────────────────────────────
    ("POKEBALL", "Poké Ball", Some("pb"), Global),
    ("GREAT_BALL", "Great Ball", Some("pb"), Global),
    ("ULTRA_BALL", "Ultra Ball", Some("pb"), Global),
    ("ROGUE_BALL", "Rogue Ball", Some("pb"), Global),
    ("MASTER_BALL", "Master Ball", Some("pb"), Global),
    // ── Recovery ───────────────────────────────────────────────
    ("POTION", "Potion", None, PokemonTargeted),
    ("SUPER_POTION", "Super Potion", None, PokemonTargeted),
    ("HYPER_POTION", "Hyper Potion", None, PokemonTargeted),
    ("MAX_POTION", "Max Potion", None, PokemonTargeted),
    ("FULL_RESTORE", "Full Restore", None, PokemonTargeted),
    ("FULL_HEAL", "Full Heal", None, PokemonTargeted),
    ("REVIVE", "Revive", None, PokemonTargeted),
    ("MAX_REVIVE", "Max Revive", None, PokemonTargeted),
    ("SACRED_ASH", "Sacred Ash", None, Global),
    ("ETHER", "Ether", None, PokemonTargeted),
    ("MAX_ETHER", "Max Ether", None, PokemonTargeted),
    ("ELIXIR", "Elixir", None, PokemonTargeted),
    ("MAX_ELIXIR", "Max Elixir", None, PokemonTargeted),
    ("PP_UP", "PP Up", None, PokemonTargeted),
    ("PP_MAX", "PP Max", None, PokemonTargeted),
    // ── Progression ────────────────────────────────────────────
    ("RARE_CANDY", "Rare Candy", None, PokemonTargeted),
    ("RARER_CANDY", "Rarer Candy", None, PokemonTargeted),
    ("MEMORY_MUSHROOM", "Memory Mushroom", None, PokemonTargeted),
    ("DNA_SPLICERS", "DNA Splicers", None, PokemonTargeted),
    ("DIRE_HIT", "Dire Hit", None, Global),
    ("MAP", "Map", None, Global),
    // ── Lures and money ────────────────────────────────────────
    ("LURE", "Lure", Some("lure"), Global),
    ("SUPER_LURE", "Super Lure", Some("lure"), Global),
    ("MAX_LURE", "Max Lure", Some("lure"), Global),
    ("NUGGET", "Nugget", Some("money"), Global),
    ("BIG_NUGGET", "Big Nugget", Some("money"), Global),
    ("RELIC_GOLD", "Relic Gold", Some("money"), Global),
    ("AMULET_COIN", "Amulet Coin", None, Global),
    // ── Vouchers ───────────────────────────────────────────────
    ("VOUCHER", "Egg Voucher", Some("voucher"), Global),
    ("VOUCHER_PLUS", "Egg Voucher Plus", Some("voucher"), Global),
    ("VOUCHER_PREMIUM", "Egg Voucher Premium", Some("voucher"), Global),
    // ── Run-wide upgrades ──────────────────────────────────────
    ("CANDY_JAR", "Candy Jar", None, Global),
    ("IV_SCANNER", "IV Scanner", None, Global),
    ("EXP_CHARM", "EXP. Charm", None, Global),
    ("SUPER_EXP_CHARM", "Super EXP. Charm", None, Global),
    ("EXP_SHARE", "EXP. All", None, Global),
    ("EXP_BALANCE", "EXP. Balance", None, Global),
    ("TERA_ORB", "Tera Orb", None, Global),
    ("BERRY_POUCH", "Berry Pouch", None, Global),
    ("ABILITY_CHARM", "Ability Charm", None, Global),
    ("LOCK_CAPSULE", "Lock Capsule", None, Global),
    ("MEGA_BRACELET", "Mega Bracelet", None, Global),
    ("DYNAMAX_BAND", "Dynamax Band", None, Global),
    ("SHINY_CHARM", "Shiny Charm", None, Global),
    ("HEALING_CHARM", "Healing Charm", None, Global),
    // ── Held items ─────────────────────────────────────────────
    ("EVIOLITE", "Eviolite", None, HeldItem),
    ("LEEK", "Leek", None, HeldItem),
    ("TOXIC_ORB", "Toxic Orb", None, HeldItem),
    ("FLAME_ORB", "Flame Orb", None, HeldItem),
    ("WHITE_HERB", "White Herb", None, HeldItem),
    ("REVIVER_SEED", "Reviver Seed", None, HeldItem),
    ("GOLDEN_PUNCH", "Golden Punch", None, HeldItem),
    ("QUICK_CLAW", "Quick Claw", None, HeldItem),
    ("WIDE_LENS", "Wide Lens", None, HeldItem),
    ("LEFTOVERS", "Leftovers", None, HeldItem),
    ("SHELL_BELL", "Shell Bell", None, HeldItem),
    ("GRIP_CLAW", "Grip Claw", None, HeldItem),
    ("SCOPE_LENS", "Scope Lens", None, HeldItem),
    ("BATON", "Baton", None, HeldItem),
    ("SOUL_DEW", "Soul Dew", None, HeldItem),
    ("SOOTHE_BELL", "Soothe Bell", None, HeldItem),
    ("FOCUS_BAND", "Focus Band", None, HeldItem),
    ("KINGS_ROCK", "King's Rock", None, HeldItem),
    ("MULTI_LENS", "Multi Lens", None, HeldItem),
    ("MINI_BLACK_HOLE", "Mini Black Hole", None, HeldItem),
    ("LUCKY_EGG", "Lucky Egg", None, HeldItem),
    ("GOLDEN_EGG", "Golden Egg", None, HeldItem),
    // ── Enemy buffs ────────────────────────────────────────────
    ("ENEMY_DAMAGE_BOOSTER", "Damage Token", None, EnemyBuff),
    ("ENEMY_DAMAGE_REDUCTION", "Protection Token", None, EnemyBuff),
    ("ENEMY_HEAL", "Recovery Token", None, EnemyBuff),
    ("ENEMY_ATTACK_POISON_CHANCE", "Poison Token", None, EnemyBuff),
    ("ENEMY_ATTACK_PARALYZE_CHANCE", "Paralyze Token", None, EnemyBuff),
    ("ENEMY_ATTACK_BURN_CHANCE", "Burn Token", None, EnemyBuff),
    ("ENEMY_STATUS_EFFECT_HEAL_CHANCE", "Full Heal Token", None, EnemyBuff),
    ("ENEMY_ENDURE_CHANCE", "Endure Token", None, EnemyBuff),
    ("ENEMY_FUSED_CHANCE", "Fusion Token", None, EnemyBuff),
];

type GeneratedRow = (
    &'static str,
    &'static str,
    Option<&'static str>,
    ItemClass,
    Generator,
);

fn generated_items() -> [GeneratedRow; 14] {
    [
        ("ATTACK_TYPE_BOOSTER", "Type Booster", None, HeldItem, Generator::AttackTypeBooster),
        ("BASE_STAT_BOOSTER", "Vitamin", None, HeldItem, Generator::BaseStatBooster),
        ("TEMP_STAT_STAGE_BOOSTER", "X Item", None, Global, Generator::TempStatBooster),
        ("SPECIES_STAT_BOOSTER", "Species Booster", None, HeldItem, Generator::SpeciesStatBooster),
        ("TM_COMMON", "Common TM", Some("tm"), PokemonTargeted, Generator::Tm(Tier::Common)),
        ("TM_GREAT", "Great TM", Some("tm"), PokemonTargeted, Generator::Tm(Tier::Great)),
        ("TM_ULTRA", "Ultra TM", Some("tm"), PokemonTargeted, Generator::Tm(Tier::Ultra)),
        ("EVOLUTION_ITEM", "Evolution Item", None, PokemonTargeted, Generator::EvolutionItem { rare: false }),
        ("RARE_EVOLUTION_ITEM", "Rare Evolution Item", None, PokemonTargeted, Generator::EvolutionItem { rare: true }),
        ("FORM_CHANGE_ITEM", "Form Change Item", None, FormChange, Generator::FormChangeItem { rare: false }),
        ("RARE_FORM_CHANGE_ITEM", "Rare Form Change Item", None, FormChange, Generator::FormChangeItem { rare: true }),
        ("MINT", "Mint", None, PokemonTargeted, Generator::Mint),
        ("TERA_SHARD", "Tera Shard", Some("tera_shard"), HeldItem, Generator::TeraShard),
        ("BERRY", "Berry", Some("berry"), HeldItem, Generator::Berry),
    ]
}
