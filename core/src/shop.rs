//! Between-wave shop stock.
//!
//! RULE: The shop is closed on every tenth wave. Otherwise one more rung
//! of consumables opens every `shop_wave_span` waves, starting at wave
//! 20. Prices are `round(base_cost * multiplier)`. No RNG is consumed.

use crate::{
    catalog::Catalog,
    config::EngineConfig,
    error::RewardResult,
    item::ConcreteItem,
    offers::RewardOffer,
    pools::TierIndex,
    types::{PoolKind, Tier},
};

/// `(kind id, price multiplier)` rungs, cheapest first.
pub const SHOP_RUNGS: &[&[(&str, f64)]] = &[
    &[("POTION", 0.2), ("ETHER", 0.4), ("REVIVE", 2.0)],
    &[("SUPER_POTION", 0.45), ("FULL_HEAL", 1.0)],
    &[("ELIXIR", 1.0), ("MAX_ETHER", 1.0)],
    &[("HYPER_POTION", 0.8), ("MAX_REVIVE", 2.75)],
    &[("MAX_POTION", 1.5), ("MAX_ELIXIR", 2.5)],
    &[("FULL_RESTORE", 2.25)],
    &[("SACRED_ASH", 10.0)],
];

/// Number of rungs open at `wave`; zero when the shop is closed.
pub fn open_rungs(wave: u32, config: &EngineConfig) -> usize {
    if config.shop_closed_every > 0 && wave % config.shop_closed_every == 0 {
        return 0;
    }
    let span = config.shop_wave_span.max(1);
    ((wave + 10).div_ceil(span) as usize).min(SHOP_RUNGS.len())
}

pub fn shop_offers_for_wave(
    wave: u32,
    base_cost: u32,
    catalog: &Catalog,
    tier_index: &TierIndex,
    config: &EngineConfig,
) -> RewardResult<Vec<RewardOffer>> {
    let mut offers = Vec::new();
    for rung in SHOP_RUNGS.iter().take(open_rungs(wave, config)) {
        for (kind_id, multiplier) in rung.iter() {
            let kind = catalog.require(kind_id)?;
            let item = ConcreteItem::fixed(kind.id(), kind.name(), None, kind.class());
            offers.push(RewardOffer {
                tier: tier_index.infer(kind_id, PoolKind::Player).unwrap_or(Tier::Common),
                item,
                upgrade_count: 0,
                cost: (base_cost as f64 * multiplier).round() as u32,
                overridden: false,
            });
        }
    }
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rungs_open_every_thirty_waves() {
        let config = EngineConfig::default_test();
        assert_eq!(open_rungs(1, &config), 1);
        assert_eq!(open_rungs(20, &config), 0, "closed on tenth waves");
        assert_eq!(open_rungs(21, &config), 2);
        assert_eq!(open_rungs(51, &config), 3);
        assert_eq!(open_rungs(199, &config), 7);
    }
}
