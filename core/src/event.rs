//! Reward events: the audit trail of every screen.
//!
//! RULE: Every result a session hands out is logged as exactly one event,
//! in the order it was produced. Replaying a seed must reproduce the
//! same payloads byte for byte.

use crate::{
    enemy::{BuffGrant, EnemyDrop, StarterGrant},
    offers::RewardOffer,
    types::{PoolKind, RunId, ScreenIndex, Tier},
};
use serde::{Deserialize, Serialize};

/// Every event emitted by a reward session.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardEvent {
    ThresholdsRebuilt {
        screen: ScreenIndex,
        pool: PoolKind,
        reroll_count: u32,
        /// `(tier, total weight)` per rollable tier.
        totals: Vec<(Tier, u32)>,
    },
    OffersDrawn {
        screen: ScreenIndex,
        reroll_count: u32,
        offers: Vec<RewardOffer>,
        retries: u32,
        exhausted_slots: Vec<usize>,
    },
    DefaultOfferUsed {
        screen: ScreenIndex,
        reason: String,
        offers: Vec<RewardOffer>,
    },
    EnemyDropsDrawn {
        screen: ScreenIndex,
        pool: PoolKind,
        drops: Vec<EnemyDrop>,
    },
    EnemyBuffGranted {
        screen: ScreenIndex,
        grant: BuffGrant,
    },
    DailyStarterGranted {
        screen: ScreenIndex,
        grants: Vec<StarterGrant>,
    },
    ShopOffered {
        screen: ScreenIndex,
        wave: u32,
        offers: Vec<RewardOffer>,
    },
    PartyLuckComputed {
        screen: ScreenIndex,
        luck: u32,
    },
}

impl RewardEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            RewardEvent::ThresholdsRebuilt { .. } => "thresholds_rebuilt",
            RewardEvent::OffersDrawn { .. } => "offers_drawn",
            RewardEvent::DefaultOfferUsed { .. } => "default_offer_used",
            RewardEvent::EnemyDropsDrawn { .. } => "enemy_drops_drawn",
            RewardEvent::EnemyBuffGranted { .. } => "enemy_buff_granted",
            RewardEvent::DailyStarterGranted { .. } => "daily_starter_granted",
            RewardEvent::ShopOffered { .. } => "shop_offered",
            RewardEvent::PartyLuckComputed { .. } => "party_luck_computed",
        }
    }

    pub fn screen(&self) -> ScreenIndex {
        match self {
            RewardEvent::ThresholdsRebuilt { screen, .. }
            | RewardEvent::OffersDrawn { screen, .. }
            | RewardEvent::DefaultOfferUsed { screen, .. }
            | RewardEvent::EnemyDropsDrawn { screen, .. }
            | RewardEvent::EnemyBuffGranted { screen, .. }
            | RewardEvent::DailyStarterGranted { screen, .. }
            | RewardEvent::ShopOffered { screen, .. }
            | RewardEvent::PartyLuckComputed { screen, .. } => *screen,
        }
    }
}

/// The reward log entry as persisted to SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub screen: ScreenIndex,
    pub event_type: String,
    pub payload: String, // JSON-serialized RewardEvent
}
