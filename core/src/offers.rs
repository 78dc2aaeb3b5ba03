//! Player reward screen assembly.
//!
//! RULES:
//!   - Slots are drawn in order; slot `i` pins `tier_overrides[i]` when given.
//!   - A slot whose item collides with an earlier slot is redrawn at the
//!     same tier and upgrade count, at most `min(5 * count, 50)` times.
//!     When the cap is hit the colliding item is kept.
//!   - Item overrides replace the first slots after the draw. They never
//!     consume RNG when their arguments are pinned.

use crate::{
    catalog::Catalog,
    error::{RewardError, RewardResult},
    item::{ConcreteItem, ItemVariant},
    party::PartyView,
    pools::TierIndex,
    rng::RewardRng,
    selector::{DrawRequest, Selector},
    types::{PoolKind, Tier},
};
use serde::{Deserialize, Serialize};

/// A caller-forced item for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOverride {
    pub kind_id: String,
    #[serde(default)]
    pub args: Option<ItemVariant>,
}

impl ItemOverride {
    pub fn new(kind_id: impl Into<String>) -> Self {
        Self {
            kind_id: kind_id.into(),
            args: None,
        }
    }

    pub fn with_args(kind_id: impl Into<String>, args: ItemVariant) -> Self {
        Self {
            kind_id: kind_id.into(),
            args: Some(args),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub count: usize,
    #[serde(default)]
    pub tier_overrides: Vec<Tier>,
    #[serde(default)]
    pub item_overrides: Vec<ItemOverride>,
}

impl OfferRequest {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn with_tiers(mut self, tiers: Vec<Tier>) -> Self {
        self.tier_overrides = tiers;
        self
    }

    pub fn with_items(mut self, items: Vec<ItemOverride>) -> Self {
        self.item_overrides = items;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOffer {
    pub item: ConcreteItem,
    pub tier: Tier,
    pub upgrade_count: u32,
    /// Shop price in money; 0 for free rewards.
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub overridden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSheet {
    pub offers: Vec<RewardOffer>,
    /// Collision redraws summed over every slot.
    pub retries: u32,
    pub slot_retries: Vec<u32>,
    /// Slots that kept a colliding item after hitting the cap.
    pub exhausted_slots: Vec<usize>,
}

impl OfferSheet {
    pub fn items(&self) -> impl Iterator<Item = &ConcreteItem> {
        self.offers.iter().map(|o| &o.item)
    }
}

/// Draw a full reward screen from the player pool.
pub fn assemble_offers(
    selector: &Selector<'_>,
    tier_index: &TierIndex,
    view: PartyView<'_>,
    request: &OfferRequest,
    rng: &mut dyn RewardRng,
) -> RewardResult<OfferSheet> {
    if selector.pool_kind() != PoolKind::Player {
        return Err(RewardError::WrongPool {
            pool: selector.pool_kind(),
            operation: "reward offers",
        });
    }
    let cap = selector.config().retries.offer_retry_cap(request.count);
    let mut sheet = OfferSheet::default();

    for slot in 0..request.count {
        let first = match request.tier_overrides.get(slot) {
            Some(tier) => DrawRequest::pinned(*tier),
            None => DrawRequest::rolled(),
        };
        let mut selection = selector.draw(view, first, rng)?;
        let mut redraws = 0;
        while redraws < cap && collides(&sheet.offers, &selection.item) {
            let retry = DrawRequest::retry(selection.tier, selection.upgrade_count);
            selection = selector.draw(view, retry, rng)?;
            redraws += 1;
        }
        if collides(&sheet.offers, &selection.item) {
            log::warn!(
                "slot {slot}: kept duplicate '{}' after {redraws} redraws",
                selection.item.name
            );
            sheet.exhausted_slots.push(slot);
        }
        sheet.retries += redraws;
        sheet.slot_retries.push(redraws);
        sheet.offers.push(RewardOffer {
            item: selection.item,
            tier: selection.tier,
            upgrade_count: selection.upgrade_count,
            cost: 0,
            overridden: false,
        });
    }

    apply_item_overrides(&mut sheet, selector.catalog(), tier_index, view, request, rng)?;
    Ok(sheet)
}

fn collides(accepted: &[RewardOffer], candidate: &ConcreteItem) -> bool {
    accepted.iter().any(|o| o.item.collides_with(candidate))
}

fn apply_item_overrides(
    sheet: &mut OfferSheet,
    catalog: &Catalog,
    tier_index: &TierIndex,
    view: PartyView<'_>,
    request: &OfferRequest,
    rng: &mut dyn RewardRng,
) -> RewardResult<()> {
    for (slot, item_override) in request.item_overrides.iter().take(request.count).enumerate() {
        let kind = catalog.require(&item_override.kind_id)?;
        let Some(item) = catalog.resolve(kind, view, item_override.args.as_ref(), rng) else {
            log::warn!("slot {slot}: override '{}' resolved to nothing", item_override.kind_id);
            continue;
        };
        let offer = &mut sheet.offers[slot];
        offer.tier = tier_index
            .infer(&item.id, PoolKind::Player)
            .unwrap_or(offer.tier);
        offer.item = item;
        offer.overridden = true;
    }
    Ok(())
}
