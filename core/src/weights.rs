//! Entry weights and the party conditions behind them.
//!
//! RULE: A weight function sees only its `WeightInput`. It never draws
//! from the RNG and never reaches for session state that is not in
//! `PartyView`.

use crate::{
    config::EngineConfig,
    party::{BattlerSummary, PartyView},
    types::{Pokeball, StatusEffect},
};
use std::fmt;

pub struct WeightInput<'a> {
    pub view: PartyView<'a>,
    pub reroll_count: u32,
    pub config: &'a EngineConfig,
}

impl<'a> WeightInput<'a> {
    pub fn party(&self) -> &'a [BattlerSummary] {
        self.view.party
    }

    pub fn wave(&self) -> u32 {
        self.view.ctx.wave_index
    }

    /// Classic run on its final wave pull.
    pub fn is_last_classic_wave(&self) -> bool {
        self.view.ctx.classic_at_or_after(self.config.last_classic_wave)
    }
}

pub type WeightFn = Box<dyn Fn(&WeightInput<'_>) -> u32 + Send + Sync>;

pub enum Weight {
    Constant(u32),
    Dynamic(WeightFn),
}

impl Weight {
    pub fn dynamic(f: impl Fn(&WeightInput<'_>) -> u32 + Send + Sync + 'static) -> Self {
        Weight::Dynamic(Box::new(f))
    }

    pub fn evaluate(&self, input: &WeightInput<'_>) -> u32 {
        match self {
            Weight::Constant(w) => *w,
            Weight::Dynamic(f) => f(input),
        }
    }

    /// The value analytics fall back to when no max weight is declared.
    pub fn constant_value(&self) -> Option<u32> {
        match self {
            Weight::Constant(w) => Some(*w),
            Weight::Dynamic(_) => None,
        }
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Constant(w) => write!(f, "Constant({w})"),
            Weight::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

// ── Common weight shapes ───────────────────────────────────

/// Zero in a classic run once `wave` is reached.
pub fn skip_in_classic_after(wave: u32, weight: u32) -> Weight {
    Weight::dynamic(move |w| if w.view.ctx.classic_at_or_after(wave) { 0 } else { weight })
}

/// Zero on the last classic wave.
pub fn skip_in_last_classic_wave(weight: u32) -> Weight {
    Weight::dynamic(move |w| if w.is_last_classic_wave() { 0 } else { weight })
}

/// Zero once a classic run holds the maximum of `ball`.
pub fn unless_max_balls(ball: Pokeball, weight: u32) -> Weight {
    Weight::dynamic(move |w| {
        let capped = w.view.ctx.game_mode.is_classic()
            && w.view.ctx.pokeballs(ball) >= w.config.max_per_type_pokeballs;
        if capped {
            0
        } else {
            weight
        }
    })
}

/// `min(ceil(wave / per), cap) * mult`.
pub fn wave_scaled(per: u32, cap: u32, mult: u32) -> Weight {
    Weight::dynamic(move |w| w.wave().div_ceil(per).min(cap) * mult)
}

// ── Party conditions ───────────────────────────────────────

/// Members missing at least `inverse_hp` HP or at or below `ratio`,
/// capped at three.
pub fn hurt_count(party: &[BattlerSummary], inverse_hp: u32, ratio: f64) -> u32 {
    let n = party
        .iter()
        .filter(|p| !p.is_fainted() && (p.inverse_hp() >= inverse_hp || p.hp_ratio() <= ratio))
        .count();
    n.min(3) as u32
}

/// Conscious members with a nearly drained move, capped at three.
pub fn low_pp_count(party: &[BattlerSummary]) -> u32 {
    party
        .iter()
        .filter(|p| p.hp > 0 && p.has_low_pp_move())
        .count()
        .min(3) as u32
}

/// Status a member is deliberately carrying via its own orb.
fn orb_sustained(p: &BattlerSummary) -> bool {
    match p.status {
        Some(StatusEffect::Toxic) => p.holds("TOXIC_ORB"),
        Some(StatusEffect::Burn) => p.holds("FLAME_ORB"),
        _ => false,
    }
}

/// Conscious members with a curable status, capped at three.
pub fn status_count(party: &[BattlerSummary]) -> u32 {
    party
        .iter()
        .filter(|p| p.hp > 0 && p.status.is_some() && !orb_sustained(p))
        .count()
        .min(3) as u32
}

pub fn fainted_count(party: &[BattlerSummary]) -> u32 {
    party.iter().filter(|p| p.is_fainted()).count() as u32
}

const ORB_ABILITIES: [&str; 4] = ["quick_feet", "guts", "marvel_scale", "magic_guard"];
const ORB_MOVES: [u32; 5] = [263, 271, 374, 415, 375];

/// Someone without either orb who could exploit `extra_abilities`.
pub fn wants_status_orb(party: &[BattlerSummary], extra_abilities: &[&str]) -> bool {
    party.iter().any(|p| {
        let holds_orb = p.holds("TOXIC_ORB") || p.holds("FLAME_ORB");
        let ability = ORB_ABILITIES
            .iter()
            .chain(extra_abilities.iter())
            .any(|a| p.has_ability(a));
        let mv = ORB_MOVES.iter().any(|m| p.knows_move(*m));
        !holds_orb && (ability || mv)
    })
}

const LEEK_SPECIES: [u32; 3] = [83, 4083, 865];

pub fn wants_leek(party: &[BattlerSummary]) -> bool {
    party.iter().any(|p| !p.holds("LEEK") && p.is_species(&LEEK_SPECIES))
}

pub fn wants_eviolite(party: &[BattlerSummary]) -> bool {
    party.iter().any(|p| p.can_evolve && !p.holds("EVIOLITE"))
}

pub fn unfused_count(party: &[BattlerSummary]) -> u32 {
    party.iter().filter(|p| !p.is_fusion()).count() as u32
}

pub fn highest_level(party: &[BattlerSummary]) -> u32 {
    party.iter().map(|p| p.level).fold(1, u32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hurt(hp: u32) -> BattlerSummary {
        let mut p = BattlerSummary::new(1, 1, 10);
        p.hp = hp;
        p
    }

    #[test]
    fn hurt_count_uses_either_threshold() {
        let party = vec![hurt(100), hurt(95), hurt(80), hurt(0)];
        assert_eq!(hurt_count(&party, 10, 0.875), 1, "95/100 is above both thresholds");
        assert_eq!(hurt_count(&party, 5, 0.875), 2);
    }

    #[test]
    fn orb_held_status_is_not_curable() {
        let mut p = hurt(50);
        p.status = Some(StatusEffect::Toxic);
        p.held_items.push(crate::party::HeldItem {
            item_id: "TOXIC_ORB".into(),
            stack_count: 1,
            max_stack: 1,
        });
        assert_eq!(status_count(&[p]), 0);
    }

    #[test]
    fn highest_level_defaults_to_one() {
        assert_eq!(highest_level(&[]), 1);
    }
}
