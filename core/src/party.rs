//! Party snapshot and run context consumed by weight functions and
//! generators.
//!
//! Everything here is read-only input. Static data tables (which TMs a
//! species learns, which evolution items apply) are resolved by the
//! caller and arrive pre-computed on each `BattlerSummary`.

use crate::{
    config::LuckConfig,
    ledger::ModifierLedger,
    types::{GameMode, MoveCategory, Pokeball, PokemonType, StatusEffect, Tier},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSummary {
    pub move_id: u32,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub pp: u32,
    #[serde(default)]
    pub pp_used: u32,
}

impl MoveSummary {
    pub fn new(move_id: u32, move_type: PokemonType, category: MoveCategory, pp: u32) -> Self {
        Self {
            move_id,
            move_type,
            category,
            pp,
            pp_used: 0,
        }
    }

    /// Five or fewer PP left and at least half spent.
    pub fn is_low_on_pp(&self) -> bool {
        self.pp_used > 0 && self.pp.saturating_sub(self.pp_used) <= 5 && self.pp_used >= self.pp / 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    pub item_id: String,
    pub stack_count: u32,
    pub max_stack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmOption {
    pub move_id: u32,
    pub name: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionItemOption {
    pub item_id: u32,
    pub name: String,
}

/// Which key item unlocks a form change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAccess {
    #[default]
    Always,
    Mega,
    Gigantamax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormChangeOption {
    pub item_id: u32,
    pub name: String,
    #[serde(default)]
    pub access: FormAccess,
    #[serde(default)]
    pub already_held: bool,
}

/// Snapshot of one party member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlerSummary {
    pub id: u32,
    pub species_id: u32,
    #[serde(default)]
    pub fusion_species_id: Option<u32>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub fainted: bool,
    #[serde(default = "default_true")]
    pub allowed_in_battle: bool,
    #[serde(default)]
    pub status: Option<StatusEffect>,
    #[serde(default)]
    pub moves: Vec<MoveSummary>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub shiny: bool,
    /// Luck contribution from shininess and variant.
    #[serde(default)]
    pub luck: u32,
    #[serde(default)]
    pub held_items: Vec<HeldItem>,
    #[serde(default)]
    pub compatible_tms: Vec<TmOption>,
    #[serde(default)]
    pub evolution_items: Vec<EvolutionItemOption>,
    #[serde(default)]
    pub form_change_items: Vec<FormChangeOption>,
    #[serde(default)]
    pub learnable_level_moves: u32,
    #[serde(default)]
    pub can_evolve: bool,
}

fn default_true() -> bool {
    true
}

impl BattlerSummary {
    /// A healthy, unremarkable member at full HP.
    pub fn new(id: u32, species_id: u32, level: u32) -> Self {
        Self {
            id,
            species_id,
            fusion_species_id: None,
            level,
            hp: 100,
            max_hp: 100,
            fainted: false,
            allowed_in_battle: true,
            status: None,
            moves: Vec::new(),
            types: vec![PokemonType::Normal],
            abilities: Vec::new(),
            shiny: false,
            luck: 0,
            held_items: Vec::new(),
            compatible_tms: Vec::new(),
            evolution_items: Vec::new(),
            form_change_items: Vec::new(),
            learnable_level_moves: 0,
            can_evolve: false,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted || self.hp == 0
    }

    pub fn inverse_hp(&self) -> u32 {
        self.max_hp.saturating_sub(self.hp)
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    pub fn is_species(&self, species: &[u32]) -> bool {
        species.contains(&self.species_id)
            || self.fusion_species_id.is_some_and(|f| species.contains(&f))
    }

    pub fn is_fusion(&self) -> bool {
        self.fusion_species_id.is_some()
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.held_items.iter().any(|h| h.item_id == item_id)
    }

    pub fn knows_move(&self, move_id: u32) -> bool {
        self.moves.iter().any(|m| m.move_id == move_id)
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }

    pub fn has_low_pp_move(&self) -> bool {
        self.moves.iter().any(MoveSummary::is_low_on_pp)
    }

    /// Counts toward party luck.
    pub fn is_luck_eligible(&self) -> bool {
        self.allowed_in_battle && !self.is_fainted()
    }
}

/// Session state the weight tables read. Passed explicitly instead of
/// reaching into a global scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardContext {
    pub wave_index: u32,
    #[serde(default)]
    pub game_mode: GameMode,
    /// Fresh-start challenge: unlock-gated items stay locked.
    #[serde(default)]
    pub fresh_start: bool,
    #[serde(default)]
    pub disable_daily_shinies: bool,
    #[serde(default)]
    pub pokeball_counts: BTreeMap<Pokeball, u32>,
    #[serde(default)]
    pub eviolite_unlocked: bool,
    #[serde(default)]
    pub mini_black_hole_unlocked: bool,
}

impl RewardContext {
    pub fn new(wave_index: u32) -> Self {
        Self {
            wave_index,
            game_mode: GameMode::Classic,
            fresh_start: false,
            disable_daily_shinies: false,
            pokeball_counts: BTreeMap::new(),
            eviolite_unlocked: false,
            mini_black_hole_unlocked: false,
        }
    }

    pub fn with_mode(mut self, game_mode: GameMode) -> Self {
        self.game_mode = game_mode;
        self
    }

    pub fn pokeballs(&self, ball: Pokeball) -> u32 {
        self.pokeball_counts.get(&ball).copied().unwrap_or(0)
    }

    /// Daily runs can opt out of shiny-driven luck entirely.
    pub fn shinies_suppressed(&self) -> bool {
        self.game_mode.is_daily() && self.disable_daily_shinies
    }

    /// Classic run at or past `wave`.
    pub fn classic_at_or_after(&self, wave: u32) -> bool {
        self.game_mode.is_classic() && self.wave_index >= wave
    }
}

/// Everything a weight function or generator may look at.
#[derive(Clone, Copy)]
pub struct PartyView<'a> {
    pub party: &'a [BattlerSummary],
    pub ctx: &'a RewardContext,
    pub ledger: &'a dyn ModifierLedger,
}

impl<'a> PartyView<'a> {
    pub fn new(party: &'a [BattlerSummary], ctx: &'a RewardContext, ledger: &'a dyn ModifierLedger) -> Self {
        Self { party, ctx, ledger }
    }

    /// Luck used for escalation rolls this draw.
    pub fn effective_luck(&self, max_luck: u32) -> u32 {
        if self.ctx.shinies_suppressed() {
            0
        } else {
            party_luck(self.party, max_luck)
        }
    }

    /// Shiny, conscious members; drives pinned-tier upgrade odds.
    pub fn shiny_count(&self) -> u32 {
        if self.ctx.shinies_suppressed() {
            return 0;
        }
        self.party.iter().filter(|p| p.shiny && !p.is_fainted()).count() as u32
    }
}

/// Sum of battle-eligible luck, clamped to `[0, max_luck]`.
pub fn party_luck(party: &[BattlerSummary], max_luck: u32) -> u32 {
    party
        .iter()
        .filter(|p| p.is_luck_eligible())
        .fold(0u32, |sum, p| sum.saturating_add(p.luck))
        .min(max_luck)
}

/// Party luck under the default luck cap.
pub fn compute_party_luck(party: &[BattlerSummary]) -> u32 {
    party_luck(party, LuckConfig::default().max_luck)
}

const LUCK_GRADES: [&str; 15] = [
    "D", "C", "C+", "B-", "B", "B+", "A-", "A", "A+", "A++", "S", "S+", "SS", "SS+", "SSS",
];

/// Letter grade shown next to the luck value.
pub fn luck_grade(luck: u32) -> &'static str {
    LUCK_GRADES[(luck as usize).min(LUCK_GRADES.len() - 1)]
}

/// Tier whose colour tints the luck display.
pub fn luck_tint_tier(luck: u32) -> Tier {
    match luck {
        l if l > 11 => Tier::Luxury,
        l if l > 9 => Tier::Master,
        l if l > 5 => Tier::Rogue,
        l if l > 2 => Tier::Ultra,
        l if l > 0 => Tier::Great,
        _ => Tier::Common,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fainted_and_benched_members_add_no_luck() {
        let mut a = BattlerSummary::new(1, 25, 10);
        a.luck = 3;
        let mut b = BattlerSummary::new(2, 26, 10);
        b.luck = 3;
        b.fainted = true;
        let mut c = BattlerSummary::new(3, 27, 10);
        c.luck = 3;
        c.allowed_in_battle = false;
        assert_eq!(compute_party_luck(&[a, b, c]), 3);
    }

    #[test]
    fn luck_is_clamped() {
        let party: Vec<BattlerSummary> = (0..6)
            .map(|i| {
                let mut p = BattlerSummary::new(i, 1, 5);
                p.luck = 3;
                p
            })
            .collect();
        assert_eq!(compute_party_luck(&party), 14);
    }

    #[test]
    fn grades_and_tints_follow_the_ladder() {
        assert_eq!(luck_grade(0), "D");
        assert_eq!(luck_grade(14), "SSS");
        assert_eq!(luck_grade(99), "SSS");
        assert_eq!(luck_tint_tier(0), Tier::Common);
        assert_eq!(luck_tint_tier(3), Tier::Ultra);
        assert_eq!(luck_tint_tier(10), Tier::Master);
        assert_eq!(luck_tint_tier(12), Tier::Luxury);
    }

    #[test]
    fn low_pp_needs_half_spent_and_five_left() {
        let mut m = MoveSummary::new(33, PokemonType::Normal, MoveCategory::Physical, 35);
        m.pp_used = 30;
        assert!(m.is_low_on_pp());
        m.pp_used = 10;
        assert!(!m.is_low_on_pp());
    }
}
