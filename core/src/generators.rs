//! Candidate lists for party-driven item families.
//!
//! RULE: Building a candidate list never touches the RNG. Resolving a
//! generator consumes exactly one draw, over the summed candidate
//! weights, no matter how many candidates there are. An empty list
//! means the generator is inapplicable for this party.

use crate::{
    item::{BaseStat, BerryType, Generator, ItemVariant, SpeciesBooster, TempStat, NATURES},
    party::{FormAccess, PartyView},
    rng::RewardRng,
    types::{MoveCategory, PokemonType, Side},
};

const FLING: u32 = 374;
const ATTACK_TYPE_CAP: u32 = 3;

/// Item id the player must hold for tera shards to appear.
pub const TERA_ACCESS_ITEM: &str = "TERA_ORB";
pub const MEGA_ACCESS_ITEM: &str = "MEGA_BRACELET";
pub const GIGANTAMAX_ACCESS_ITEM: &str = "DYNAMAX_BAND";

impl Generator {
    /// Weighted candidates for this party, in a stable order.
    pub fn candidates(&self, view: PartyView<'_>) -> Vec<(ItemVariant, u32)> {
        match *self {
            Generator::AttackTypeBooster => attack_type_candidates(view),
            Generator::BaseStatBooster => BaseStat::ALL
                .iter()
                .map(|&stat| (ItemVariant::BaseStat { stat }, 1))
                .collect(),
            Generator::TempStatBooster => TempStat::ALL
                .iter()
                .map(|&stat| (ItemVariant::TempStat { stat }, 1))
                .collect(),
            Generator::SpeciesStatBooster => species_booster_candidates(view),
            Generator::Tm(tier) => {
                let mut seen: Vec<u32> = Vec::new();
                let mut out = Vec::new();
                for member in view.party {
                    for tm in &member.compatible_tms {
                        if tm.tier != tier
                            || member.knows_move(tm.move_id)
                            || tm.name.ends_with(" (N)")
                            || seen.contains(&tm.move_id)
                        {
                            continue;
                        }
                        seen.push(tm.move_id);
                        out.push((
                            ItemVariant::Tm {
                                move_id: tm.move_id,
                                name: tm.name.clone(),
                                tier,
                            },
                            1,
                        ));
                    }
                }
                out
            }
            // Duplicates are kept: two members wanting the same stone
            // double its odds.
            Generator::EvolutionItem { rare } => view
                .party
                .iter()
                .flat_map(|member| member.evolution_items.iter())
                .filter(|e| (e.item_id > 50) == rare)
                .map(|e| {
                    (
                        ItemVariant::Evolution {
                            item_id: e.item_id,
                            name: e.name.clone(),
                        },
                        1,
                    )
                })
                .collect(),
            Generator::FormChangeItem { rare } => {
                let mega = view.ledger.holds(MEGA_ACCESS_ITEM, Side::Player);
                let gmax = view.ledger.holds(GIGANTAMAX_ACCESS_ITEM, Side::Player);
                let mut seen: Vec<u32> = Vec::new();
                let mut out = Vec::new();
                for option in view.party.iter().flat_map(|m| m.form_change_items.iter()) {
                    let unlocked = match option.access {
                        FormAccess::Always => true,
                        FormAccess::Mega => mega,
                        FormAccess::Gigantamax => gmax,
                    };
                    if !unlocked || option.already_held || (option.item_id < 100) != rare {
                        continue;
                    }
                    if seen.contains(&option.item_id) {
                        continue;
                    }
                    seen.push(option.item_id);
                    out.push((
                        ItemVariant::FormChange {
                            item_id: option.item_id,
                            name: option.name.clone(),
                        },
                        1,
                    ));
                }
                out
            }
            Generator::Mint => (0..NATURES.len() as u8)
                .map(|nature| (ItemVariant::Mint { nature }, 1))
                .collect(),
            Generator::TeraShard => tera_shard_candidates(view),
            Generator::Berry => berry_candidates(),
        }
    }

    /// Pre-check used while building thresholds. Draws nothing.
    pub fn is_applicable(&self, view: PartyView<'_>) -> bool {
        self.candidates(view).iter().any(|(_, w)| *w > 0)
    }

    /// Whether `variant` is something this generator could produce.
    pub fn accepts(&self, variant: &ItemVariant) -> bool {
        matches!(
            (self, variant),
            (Generator::AttackTypeBooster, ItemVariant::AttackType { .. })
                | (Generator::BaseStatBooster, ItemVariant::BaseStat { .. })
                | (Generator::TempStatBooster, ItemVariant::TempStat { .. })
                | (Generator::SpeciesStatBooster, ItemVariant::SpeciesBooster { .. })
                | (Generator::Tm(_), ItemVariant::Tm { .. })
                | (Generator::EvolutionItem { .. }, ItemVariant::Evolution { .. })
                | (Generator::FormChangeItem { .. }, ItemVariant::FormChange { .. })
                | (Generator::Mint, ItemVariant::Mint { .. })
                | (Generator::TeraShard, ItemVariant::TeraShard { .. })
                | (Generator::Berry, ItemVariant::Berry { .. })
        )
    }

    /// Resolve to a variant. Pinned arguments bypass the RNG entirely.
    pub fn generate(
        &self,
        view: PartyView<'_>,
        pinned: Option<&ItemVariant>,
        rng: &mut dyn RewardRng,
    ) -> Option<ItemVariant> {
        if let Some(variant) = pinned.filter(|v| self.accepts(v)) {
            return Some(variant.clone());
        }
        pick_weighted(self.candidates(view), rng, self.draw_label())
    }

    fn draw_label(&self) -> &'static str {
        match self {
            Generator::AttackTypeBooster => "Generating a move type booster",
            Generator::BaseStatBooster => "Choosing a vitamin",
            Generator::TempStatBooster => "Choosing a temp stat booster",
            Generator::SpeciesStatBooster => "Randomly choosing a species booster",
            Generator::Tm(_) => "Choosing a TM to give",
            Generator::EvolutionItem { .. } => "Choosing an evolution item",
            Generator::FormChangeItem { .. } => "Choosing a form change item",
            Generator::Mint => "Choosing a Mint",
            Generator::TeraShard => "Choosing a Tera Shard type",
            Generator::Berry => "Choosing a Berry",
        }
    }
}

/// One draw over the summed weights; first cumulative boundary above
/// the roll wins.
fn pick_weighted(
    candidates: Vec<(ItemVariant, u32)>,
    rng: &mut dyn RewardRng,
    label: &'static str,
) -> Option<ItemVariant> {
    let total: u32 = candidates.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return None;
    }
    let roll = rng.next_int(total, label);
    let mut cumulative = 0;
    for (variant, weight) in candidates {
        cumulative += weight;
        if roll < cumulative {
            return Some(variant);
        }
    }
    None
}

/// Each damaging move adds one to its type, capped at three per type,
/// first-seen order.
fn attack_type_candidates(view: PartyView<'_>) -> Vec<(ItemVariant, u32)> {
    let mut weights: Vec<(PokemonType, u32)> = Vec::new();
    let damaging = view
        .party
        .iter()
        .flat_map(|p| p.moves.iter())
        .filter(|m| m.category != MoveCategory::Status);
    for mv in damaging {
        match weights.iter_mut().find(|(t, _)| *t == mv.move_type) {
            Some((_, w)) => *w = (*w + 1).min(ATTACK_TYPE_CAP),
            None => weights.push((mv.move_type, 1)),
        }
    }
    weights
        .into_iter()
        .map(|(move_type, w)| (ItemVariant::AttackType { move_type }, w))
        .collect()
}

fn species_booster_candidates(view: PartyView<'_>) -> Vec<(ItemVariant, u32)> {
    let mut weights = [0u32; 4];
    for member in view.party {
        let has_fling = member.knows_move(FLING);
        for (slot, item) in SpeciesBooster::ALL.iter().enumerate() {
            if member.holds(item.held_id()) {
                continue;
            }
            let light_ball_via_fling = *item == SpeciesBooster::LightBall && has_fling;
            if member.is_species(item.species()) || light_ball_via_fling {
                weights[slot] += 1;
            }
        }
    }
    SpeciesBooster::ALL
        .iter()
        .zip(weights)
        .filter(|(_, w)| *w > 0)
        .map(|(&item, w)| (ItemVariant::SpeciesBooster { item }, w))
        .collect()
}

/// Folds "1/3 a party type, else 1/64 Stellar, else any of 18" into a
/// single weighted draw.
fn tera_shard_candidates(view: PartyView<'_>) -> Vec<(ItemVariant, u32)> {
    if !view.ledger.holds(TERA_ACCESS_ITEM, Side::Player) {
        return Vec::new();
    }
    let party_types: Vec<PokemonType> = view.party.iter().flat_map(|p| p.types.iter().copied()).collect();
    let (party_weight, stellar_weight, type_weight) = if party_types.is_empty() {
        (0, 18, 63)
    } else {
        let n = party_types.len() as u32;
        (1152, 36 * n, 126 * n)
    };
    let mut out: Vec<(ItemVariant, u32)> = party_types
        .into_iter()
        .map(|tera_type| (ItemVariant::TeraShard { tera_type }, party_weight))
        .collect();
    out.push((
        ItemVariant::TeraShard {
            tera_type: PokemonType::Stellar,
        },
        stellar_weight,
    ));
    out.extend(
        PokemonType::STANDARD
            .iter()
            .map(|&tera_type| (ItemVariant::TeraShard { tera_type }, type_weight)),
    );
    out
}

/// Sitrus, Lum and Leppa at 1/6 each; the eight pinch berries share
/// the remaining half.
fn berry_candidates() -> Vec<(ItemVariant, u32)> {
    const TABLE: [(BerryType, u32); 11] = [
        (BerryType::Sitrus, 16),
        (BerryType::Lum, 16),
        (BerryType::Leppa, 16),
        (BerryType::Enigma, 6),
        (BerryType::Liechi, 6),
        (BerryType::Ganlon, 6),
        (BerryType::Petaya, 6),
        (BerryType::Apicot, 6),
        (BerryType::Salac, 6),
        (BerryType::Lansat, 6),
        (BerryType::Starf, 6),
    ];
    TABLE
        .iter()
        .map(|&(berry, w)| (ItemVariant::Berry { berry }, w))
        .collect()
}
