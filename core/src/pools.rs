//! Weighted pool tables, one per reward source.
//!
//! RULE: Entry order inside a tier is part of the replay contract. The
//! threshold table maps RNG values to entry indices, so inserting,
//! removing or reordering an entry changes every seeded run. Append
//! new entries at the end of their tier.

use crate::{
    catalog::Catalog,
    error::{RewardError, RewardResult},
    types::{Pokeball, PoolKind, Tier},
    weights::{
        fainted_count, highest_level, hurt_count, low_pp_count, skip_in_classic_after,
        skip_in_last_classic_wave, status_count, unfused_count, unless_max_balls, wants_eviolite,
        wants_leek, wants_status_orb, wave_scaled, Weight,
    },
};
use std::collections::HashMap;

#[derive(Debug)]
pub struct WeightedEntry {
    pub kind_id: &'static str,
    pub weight: Weight,
    /// Analytics-only ceiling. 0 hides the entry from odds output.
    pub max_weight: u32,
}

impl WeightedEntry {
    pub fn constant(kind_id: &'static str, weight: u32) -> Self {
        Self {
            kind_id,
            weight: Weight::Constant(weight),
            max_weight: weight,
        }
    }

    pub fn dynamic(kind_id: &'static str, weight: Weight, max_weight: u32) -> Self {
        let max_weight = if max_weight > 0 {
            max_weight
        } else {
            weight.constant_value().unwrap_or(0)
        };
        Self {
            kind_id,
            weight,
            max_weight,
        }
    }
}

#[derive(Debug)]
pub struct ModifierPool {
    kind: PoolKind,
    tiers: [Vec<WeightedEntry>; 5],
}

impl ModifierPool {
    pub fn new(kind: PoolKind) -> Self {
        Self {
            kind,
            tiers: Default::default(),
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Append an entry. Luxury is display-only and is ignored.
    pub fn push(&mut self, tier: Tier, entry: WeightedEntry) -> &mut Self {
        if let Some(list) = self.tiers.get_mut(tier.index()) {
            list.push(entry);
        }
        self
    }

    pub fn with_tier(mut self, tier: Tier, entries: Vec<WeightedEntry>) -> Self {
        for entry in entries {
            self.push(tier, entry);
        }
        self
    }

    pub fn entries(&self, tier: Tier) -> &[WeightedEntry] {
        self.tiers.get(tier.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_entries(&self, tier: Tier) -> bool {
        !self.entries(tier).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(Vec::is_empty)
    }

    /// Lowest tier containing `kind_id`.
    pub fn tier_of(&self, kind_id: &str) -> Option<Tier> {
        Tier::ROLLABLE
            .into_iter()
            .find(|t| self.entries(*t).iter().any(|e| e.kind_id == kind_id))
    }
}

/// The five pools the engine draws from.
#[derive(Debug)]
pub struct PoolSet {
    pub player: ModifierPool,
    pub wild: ModifierPool,
    pub trainer: ModifierPool,
    pub enemy_buff: ModifierPool,
    pub daily_starter: ModifierPool,
}

impl PoolSet {
    pub fn standard() -> Self {
        Self {
            player: player_pool(),
            wild: wild_pool(),
            trainer: trainer_pool(),
            enemy_buff: enemy_buff_pool(),
            daily_starter: daily_starter_pool(),
        }
    }

    pub fn get(&self, kind: PoolKind) -> &ModifierPool {
        match kind {
            PoolKind::Player => &self.player,
            PoolKind::Wild => &self.wild,
            PoolKind::Trainer => &self.trainer,
            PoolKind::EnemyBuff => &self.enemy_buff,
            PoolKind::DailyStarter => &self.daily_starter,
        }
    }

    /// Every referenced kind must be registered.
    pub fn validate_against(&self, catalog: &Catalog) -> RewardResult<()> {
        for kind in PoolKind::ALL {
            for tier in Tier::ROLLABLE {
                for entry in self.get(kind).entries(tier) {
                    if catalog.get(entry.kind_id).is_none() {
                        return Err(RewardError::UnknownItemKind {
                            id: entry.kind_id.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reverse lookup of an item's tier, computed once per engine.
#[derive(Debug, Clone, Default)]
pub struct TierIndex {
    by_pool: HashMap<(PoolKind, String), Tier>,
}

impl TierIndex {
    pub fn build(pools: &PoolSet) -> Self {
        let mut by_pool = HashMap::new();
        for kind in PoolKind::ALL {
            let pool = pools.get(kind);
            for tier in Tier::ROLLABLE {
                for entry in pool.entries(tier) {
                    by_pool.entry((kind, entry.kind_id.to_string())).or_insert(tier);
                }
            }
        }
        Self { by_pool }
    }

    /// Tier of `kind_id`, searching pools in the fallback order for `pool`.
    pub fn infer(&self, kind_id: &str, pool: PoolKind) -> Option<Tier> {
        pool.inference_order()
            .iter()
            .find_map(|p| self.by_pool.get(&(*p, kind_id.to_string())).copied())
    }
}

fn c(kind_id: &'static str, weight: u32) -> WeightedEntry {
    WeightedEntry::constant(kind_id, weight)
}

fn d(kind_id: &'static str, weight: Weight, max_weight: u32) -> WeightedEntry {
    WeightedEntry::dynamic(kind_id, weight, max_weight)
}

pub fn player_pool() -> ModifierPool {
    ModifierPool::new(PoolKind::Player)
        .with_tier(
            Tier::Common,
            vec![
                d("POKEBALL", unless_max_balls(Pokeball::Poke, 6), 6),
                c("RARE_CANDY", 2),
                d("POTION", Weight::dynamic(|w| hurt_count(w.party(), 10, 0.875) * 3), 9),
                d("SUPER_POTION", Weight::dynamic(|w| hurt_count(w.party(), 25, 0.75)), 3),
                d("ETHER", Weight::dynamic(|w| low_pp_count(w.party()) * 3), 9),
                d("MAX_ETHER", Weight::dynamic(|w| low_pp_count(w.party())), 3),
                d("LURE", skip_in_last_classic_wave(2), 0),
                c("TEMP_STAT_STAGE_BOOSTER", 4),
                c("BERRY", 2),
                c("TM_COMMON", 2),
            ],
        )
        .with_tier(
            Tier::Great,
            vec![
                d("GREAT_BALL", unless_max_balls(Pokeball::Great, 6), 6),
                c("PP_UP", 2),
                d("FULL_HEAL", Weight::dynamic(|w| status_count(w.party()) * 6), 18),
                d("REVIVE", Weight::dynamic(|w| fainted_count(w.party()).min(3) * 9), 27),
                d("MAX_REVIVE", Weight::dynamic(|w| fainted_count(w.party()).min(3) * 3), 9),
                d(
                    "SACRED_ASH",
                    Weight::dynamic(|w| {
                        let half = (w.party().len() as u32).div_ceil(2);
                        u32::from(fainted_count(w.party()) >= half)
                    }),
                    1,
                ),
                d("HYPER_POTION", Weight::dynamic(|w| hurt_count(w.party(), 100, 0.625) * 3), 9),
                d("MAX_POTION", Weight::dynamic(|w| hurt_count(w.party(), 150, 0.5)), 3),
                d(
                    "FULL_RESTORE",
                    Weight::dynamic(|w| (hurt_count(w.party(), 150, 0.5) + status_count(w.party())) / 2),
                    3,
                ),
                d("ELIXIR", Weight::dynamic(|w| low_pp_count(w.party()) * 3), 9),
                d("MAX_ELIXIR", Weight::dynamic(|w| low_pp_count(w.party())), 3),
                c("DIRE_HIT", 4),
                d("SUPER_LURE", skip_in_last_classic_wave(4), 0),
                d("NUGGET", skip_in_last_classic_wave(5), 0),
                d("EVOLUTION_ITEM", wave_scaled(15, 8, 1), 8),
                d(
                    "MAP",
                    Weight::dynamic(|w| u32::from(w.view.ctx.game_mode.is_classic() && w.wave() < 180)),
                    1,
                ),
                c("TM_GREAT", 3),
                d(
                    "MEMORY_MUSHROOM",
                    Weight::dynamic(|w| {
                        if !w.party().iter().any(|p| p.learnable_level_moves > 0) {
                            return 0;
                        }
                        highest_level(w.party()).div_ceil(20).min(4)
                    }),
                    4,
                ),
                c("BASE_STAT_BOOSTER", 3),
                c("TERA_SHARD", 1),
                d(
                    "DNA_SPLICERS",
                    Weight::dynamic(|w| {
                        if w.view.ctx.game_mode.is_spliced_only() && unfused_count(w.party()) > 1 {
                            4
                        } else {
                            0
                        }
                    }),
                    0,
                ),
                d(
                    "VOUCHER",
                    Weight::dynamic(|w| {
                        if w.view.ctx.game_mode.is_daily() {
                            0
                        } else {
                            1u32.saturating_sub(w.reroll_count)
                        }
                    }),
                    1,
                ),
            ],
        )
        .with_tier(
            Tier::Ultra,
            vec![
                d("ULTRA_BALL", unless_max_balls(Pokeball::Ultra, 15), 15),
                d("MAX_LURE", skip_in_last_classic_wave(4), 0),
                d("BIG_NUGGET", skip_in_last_classic_wave(12), 0),
                c("PP_MAX", 3),
                c("MINT", 4),
                d("RARE_EVOLUTION_ITEM", wave_scaled(15, 8, 4), 32),
                d("FORM_CHANGE_ITEM", wave_scaled(50, 4, 6), 24),
                d("AMULET_COIN", skip_in_last_classic_wave(3), 0),
                d(
                    "EVIOLITE",
                    Weight::dynamic(|w| {
                        let ctx = w.view.ctx;
                        let unlocked = ctx.game_mode.is_daily() || (!ctx.fresh_start && ctx.eviolite_unlocked);
                        if unlocked && wants_eviolite(w.party()) {
                            10
                        } else {
                            0
                        }
                    }),
                    0,
                ),
                c("SPECIES_STAT_BOOSTER", 12),
                d("LEEK", Weight::dynamic(|w| if wants_leek(w.party()) { 12 } else { 0 }), 12),
                d(
                    "TOXIC_ORB",
                    Weight::dynamic(|w| {
                        if wants_status_orb(w.party(), &["toxic_boost", "poison_heal"]) {
                            10
                        } else {
                            0
                        }
                    }),
                    10,
                ),
                d(
                    "FLAME_ORB",
                    Weight::dynamic(|w| if wants_status_orb(w.party(), &["flare_boost"]) { 10 } else { 0 }),
                    10,
                ),
                d("WHITE_HERB", Weight::Constant(0), 10),
                c("REVIVER_SEED", 4),
                d("CANDY_JAR", skip_in_last_classic_wave(5), 0),
                c("ATTACK_TYPE_BOOSTER", 9),
                c("TM_ULTRA", 11),
                c("RARER_CANDY", 4),
                d("GOLDEN_PUNCH", skip_in_last_classic_wave(2), 0),
                d("IV_SCANNER", skip_in_last_classic_wave(4), 0),
                d("EXP_CHARM", skip_in_last_classic_wave(8), 0),
                d("EXP_SHARE", skip_in_last_classic_wave(10), 0),
                d("EXP_BALANCE", skip_in_last_classic_wave(3), 0),
                d(
                    "TERA_ORB",
                    Weight::dynamic(|w| ((w.wave() / 50) * 2).clamp(1, 4)),
                    4,
                ),
                c("QUICK_CLAW", 3),
                c("WIDE_LENS", 4),
            ],
        )
        .with_tier(
            Tier::Rogue,
            vec![
                d("ROGUE_BALL", unless_max_balls(Pokeball::Rogue, 16), 16),
                d("RELIC_GOLD", skip_in_last_classic_wave(2), 0),
                c("LEFTOVERS", 3),
                c("SHELL_BELL", 3),
                c("BERRY_POUCH", 4),
                c("GRIP_CLAW", 5),
                c("SCOPE_LENS", 4),
                c("BATON", 2),
                c("SOUL_DEW", 7),
                c("SOOTHE_BELL", 4),
                d("ABILITY_CHARM", skip_in_classic_after(189, 6), 0),
                c("FOCUS_BAND", 5),
                c("KINGS_ROCK", 3),
                d("LOCK_CAPSULE", skip_in_last_classic_wave(3), 0),
                d("SUPER_EXP_CHARM", skip_in_last_classic_wave(8), 0),
                d("RARE_FORM_CHANGE_ITEM", wave_scaled(50, 4, 6), 24),
                d("MEGA_BRACELET", wave_scaled(50, 4, 9), 36),
                d("DYNAMAX_BAND", wave_scaled(50, 4, 9), 36),
                d(
                    "VOUCHER_PLUS",
                    Weight::dynamic(|w| {
                        if w.view.ctx.game_mode.is_daily() {
                            0
                        } else {
                            3u32.saturating_sub(w.reroll_count)
                        }
                    }),
                    3,
                ),
            ],
        )
        .with_tier(
            Tier::Master,
            vec![
                d("MASTER_BALL", unless_max_balls(Pokeball::Master, 24), 24),
                c("SHINY_CHARM", 14),
                c("HEALING_CHARM", 18),
                c("MULTI_LENS", 18),
                d(
                    "VOUCHER_PREMIUM",
                    Weight::dynamic(|w| {
                        let mode = w.view.ctx.game_mode;
                        if mode.is_daily() || mode.is_endless() || mode.is_spliced_only() {
                            0
                        } else {
                            5u32.saturating_sub(w.reroll_count.saturating_mul(2))
                        }
                    }),
                    5,
                ),
                d(
                    "DNA_SPLICERS",
                    Weight::dynamic(|w| {
                        if !w.view.ctx.game_mode.is_spliced_only() && unfused_count(w.party()) > 1 {
                            24
                        } else {
                            0
                        }
                    }),
                    24,
                ),
                d(
                    "MINI_BLACK_HOLE",
                    Weight::dynamic(|w| {
                        let ctx = w.view.ctx;
                        u32::from(!ctx.fresh_start && ctx.mini_black_hole_unlocked)
                    }),
                    1,
                ),
            ],
        )
}

pub fn wild_pool() -> ModifierPool {
    ModifierPool::new(PoolKind::Wild)
        .with_tier(Tier::Common, vec![c("BERRY", 1)])
        .with_tier(Tier::Great, vec![c("BASE_STAT_BOOSTER", 1)])
        .with_tier(Tier::Ultra, vec![c("ATTACK_TYPE_BOOSTER", 10), c("WHITE_HERB", 0)])
        .with_tier(Tier::Rogue, vec![c("LUCKY_EGG", 4)])
        .with_tier(Tier::Master, vec![c("GOLDEN_EGG", 1)])
}

pub fn trainer_pool() -> ModifierPool {
    ModifierPool::new(PoolKind::Trainer)
        .with_tier(Tier::Common, vec![c("BERRY", 8), c("BASE_STAT_BOOSTER", 3)])
        .with_tier(Tier::Great, vec![c("BASE_STAT_BOOSTER", 3)])
        .with_tier(Tier::Ultra, vec![c("ATTACK_TYPE_BOOSTER", 10), c("WHITE_HERB", 0)])
        .with_tier(
            Tier::Rogue,
            vec![
                c("FOCUS_BAND", 2),
                c("LUCKY_EGG", 4),
                c("QUICK_CLAW", 1),
                c("GRIP_CLAW", 1),
                c("WIDE_LENS", 1),
            ],
        )
        .with_tier(
            Tier::Master,
            vec![
                c("KINGS_ROCK", 1),
                c("LEFTOVERS", 1),
                c("SHELL_BELL", 1),
                c("SCOPE_LENS", 1),
            ],
        )
}

/// Rogue and Master are intentionally empty; draws there fall back.
pub fn enemy_buff_pool() -> ModifierPool {
    ModifierPool::new(PoolKind::EnemyBuff)
        .with_tier(
            Tier::Common,
            vec![
                c("ENEMY_DAMAGE_BOOSTER", 9),
                c("ENEMY_DAMAGE_REDUCTION", 9),
                c("ENEMY_ATTACK_POISON_CHANCE", 3),
                c("ENEMY_ATTACK_PARALYZE_CHANCE", 3),
                c("ENEMY_ATTACK_BURN_CHANCE", 3),
                c("ENEMY_STATUS_EFFECT_HEAL_CHANCE", 9),
                c("ENEMY_ENDURE_CHANCE", 4),
                c("ENEMY_FUSED_CHANCE", 1),
            ],
        )
        .with_tier(
            Tier::Great,
            vec![
                c("ENEMY_DAMAGE_BOOSTER", 5),
                c("ENEMY_DAMAGE_REDUCTION", 5),
                c("ENEMY_STATUS_EFFECT_HEAL_CHANCE", 5),
                c("ENEMY_ENDURE_CHANCE", 5),
                c("ENEMY_FUSED_CHANCE", 1),
            ],
        )
        .with_tier(
            Tier::Ultra,
            vec![
                c("ENEMY_DAMAGE_BOOSTER", 10),
                c("ENEMY_DAMAGE_REDUCTION", 10),
                c("ENEMY_HEAL", 10),
                c("ENEMY_STATUS_EFFECT_HEAL_CHANCE", 10),
                c("ENEMY_ENDURE_CHANCE", 10),
                c("ENEMY_FUSED_CHANCE", 5),
            ],
        )
}

pub fn daily_starter_pool() -> ModifierPool {
    ModifierPool::new(PoolKind::DailyStarter)
        .with_tier(Tier::Common, vec![c("BASE_STAT_BOOSTER", 1), c("BERRY", 3)])
        .with_tier(Tier::Great, vec![c("ATTACK_TYPE_BOOSTER", 5)])
        .with_tier(
            Tier::Ultra,
            vec![
                c("REVIVER_SEED", 4),
                c("SOOTHE_BELL", 1),
                c("SOUL_DEW", 1),
                c("GOLDEN_PUNCH", 1),
            ],
        )
        .with_tier(
            Tier::Rogue,
            vec![
                c("GRIP_CLAW", 5),
                c("BATON", 2),
                c("FOCUS_BAND", 5),
                c("QUICK_CLAW", 3),
                c("KINGS_ROCK", 3),
            ],
        )
        .with_tier(Tier::Master, vec![c("LEFTOVERS", 1), c("SHELL_BELL", 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pools_reference_registered_kinds() {
        PoolSet::standard()
            .validate_against(&Catalog::standard())
            .expect("every pool entry is registered");
    }

    #[test]
    fn tier_inference_follows_fallback_order() {
        let index = TierIndex::build(&PoolSet::standard());
        assert_eq!(index.infer("DNA_SPLICERS", PoolKind::Player), Some(Tier::Great));
        assert_eq!(index.infer("LUCKY_EGG", PoolKind::Player), Some(Tier::Rogue), "found via trainer");
        assert_eq!(index.infer("GOLDEN_EGG", PoolKind::Trainer), Some(Tier::Master), "found via wild");
        assert_eq!(index.infer("LEFTOVERS", PoolKind::DailyStarter), Some(Tier::Master));
        assert_eq!(index.infer("POTION", PoolKind::EnemyBuff), None);
    }

    #[test]
    fn dynamic_entries_without_ceiling_hide_from_analytics() {
        let pool = player_pool();
        let lure = pool.entries(Tier::Common).iter().find(|e| e.kind_id == "LURE").unwrap();
        assert_eq!(lure.max_weight, 0);
        assert!(!pool.has_entries(Tier::Luxury));
    }
}
