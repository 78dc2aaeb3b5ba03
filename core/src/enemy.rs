//! Opponent-side rewards: held-item drops, enemy buffs, and the daily
//! starter kit.
//!
//! RULES:
//!   - A drop's upgrade roll comes before its tier roll.
//!   - Enemy buffs always grant the stack size of the requested tier,
//!     even when a redraw lands on a lower tier.
//!   - The starter kit rolls its own 64-wide tier bands, three items per
//!     party member, in party order.

use crate::{
    config::EngineConfig,
    error::{RewardError, RewardResult},
    item::ConcreteItem,
    party::PartyView,
    rng::RewardRng,
    selector::{DrawRequest, Selector},
    types::{PoolKind, Tier},
};
use serde::{Deserialize, Serialize};

/// Id of the end-of-millennium bonus drop.
pub const MINI_BLACK_HOLE: &str = "MINI_BLACK_HOLE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDrop {
    pub item: ConcreteItem,
    pub tier: Tier,
    pub upgrade_count: u32,
}

/// A buff the opponent already carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBuff {
    pub item_id: String,
    pub stack_count: u32,
    pub max_stack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffGrant {
    pub item: ConcreteItem,
    pub tier: Tier,
    pub stack_count: u32,
    /// Redraws spent looking for a buff with room.
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterGrant {
    /// Battler id the item is attached to.
    pub holder: u32,
    pub item: ConcreteItem,
    pub tier: Tier,
}

fn require_pool(selector: &Selector<'_>, allowed: &[PoolKind], operation: &'static str) -> RewardResult<()> {
    if allowed.contains(&selector.pool_kind()) {
        Ok(())
    } else {
        Err(RewardError::WrongPool {
            pool: selector.pool_kind(),
            operation,
        })
    }
}

/// One held-item drop from the wild or trainer pool.
pub fn draw_enemy_drop(
    selector: &Selector<'_>,
    view: PartyView<'_>,
    upgrade_chance: u32,
    rng: &mut dyn RewardRng,
) -> RewardResult<EnemyDrop> {
    require_pool(selector, &[PoolKind::Wild, PoolKind::Trainer], "enemy drops")?;
    let mut upgrades = 0;
    if upgrade_chance > 0 && rng.next_int(upgrade_chance, "Chance to upgrade an opponent's item") == 0 {
        upgrades = 1;
    }
    let selection = selector.draw(view, DrawRequest::rolled_with_upgrades(upgrades), rng)?;
    Ok(EnemyDrop {
        item: selection.item,
        tier: selection.tier,
        upgrade_count: selection.upgrade_count,
    })
}

/// `count` drops, plus the Mini Black Hole on every interval wave.
pub fn draw_enemy_drops(
    selector: &Selector<'_>,
    view: PartyView<'_>,
    count: usize,
    upgrade_chance: u32,
    rng: &mut dyn RewardRng,
) -> RewardResult<Vec<EnemyDrop>> {
    let mut drops = (0..count)
        .map(|_| draw_enemy_drop(selector, view, upgrade_chance, rng))
        .collect::<RewardResult<Vec<_>>>()?;
    let interval = selector.config().mini_black_hole_wave_interval;
    let wave = view.ctx.wave_index;
    if interval > 0 && wave > 0 && wave % interval == 0 {
        let kind = selector.catalog().require(MINI_BLACK_HOLE)?;
        if let Some(item) = selector.catalog().resolve(kind, view, None, rng) {
            log::info!("wave {wave}: adding {MINI_BLACK_HOLE} to enemy drops");
            drops.push(EnemyDrop {
                item,
                tier: Tier::Master,
                upgrade_count: 0,
            });
        }
    }
    Ok(drops)
}

/// Grant one buff at `tier`, preferring buffs the opponent can still stack.
pub fn draw_enemy_buff(
    selector: &Selector<'_>,
    view: PartyView<'_>,
    tier: Tier,
    existing: &[ExistingBuff],
    rng: &mut dyn RewardRng,
) -> RewardResult<BuffGrant> {
    require_pool(selector, &[PoolKind::EnemyBuff], "enemy buffs")?;
    let config = selector.config();
    let stack = config.enemy_buff_stacks.for_tier(tier);
    let cap = config.retries.enemy_buff_cap;
    let window = config.retries.enemy_buff_full_grant_window;

    let request = DrawRequest::retry(tier, 0);
    let mut selection = selector.draw(view, request, rng)?;
    let mut attempt = 1;
    while attempt < cap {
        let needed = if attempt < window { stack } else { 1 };
        let blocked = existing
            .iter()
            .find(|b| b.item_id == selection.item.id)
            .is_some_and(|b| b.max_stack < b.stack_count + needed);
        if !blocked {
            break;
        }
        selection = selector.draw(view, request, rng)?;
        attempt += 1;
    }
    log::debug!(
        "enemy buff {} at {tier} (x{stack}) after {} redraws",
        selection.item.id,
        attempt - 1
    );
    Ok(BuffGrant {
        item: selection.item,
        tier: selection.tier,
        stack_count: stack,
        retries: attempt - 1,
    })
}

/// Three starter items per member for daily runs.
pub fn draw_daily_starter_kit(
    selector: &Selector<'_>,
    view: PartyView<'_>,
    rng: &mut dyn RewardRng,
) -> RewardResult<Vec<StarterGrant>> {
    require_pool(selector, &[PoolKind::DailyStarter], "daily starter items")?;
    let config: &EngineConfig = selector.config();
    let bands = &config.daily_starter_bands;
    let mut grants = Vec::new();
    for member in view.party {
        for _ in 0..config.daily_starter_items_per_member {
            let value = rng.next_int(bands.roll_range, "Choosing modifier tier for daily items");
            let tier = bands.tier_for(value);
            let selection = selector.draw(view, DrawRequest::retry(tier, 0), rng)?;
            grants.push(StarterGrant {
                holder: member.id,
                item: selection.item,
                tier: selection.tier,
            });
        }
    }
    log::info!("daily starter kit: {} items for {} members", grants.len(), view.party.len());
    Ok(grants)
}

