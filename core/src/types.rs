//! Shared primitive types used across the reward engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical run identifier.
pub type RunId = String;

/// Sequential reward-screen number within a run.
pub type ScreenIndex = u64;

/// Rarity band. Ordered by ascending rarity.
///
/// `Luxury` is display-only (luck tinting) and never appears in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Common,
    Great,
    Ultra,
    Rogue,
    Master,
    Luxury,
}

impl Tier {
    /// Tiers a pool can hold, lowest first.
    pub const ROLLABLE: [Tier; 5] = [
        Tier::Common,
        Tier::Great,
        Tier::Ultra,
        Tier::Rogue,
        Tier::Master,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Rollable tier at `index`; `None` past Master.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ROLLABLE.get(index).copied()
    }

    /// The next tier down, or `None` at Common.
    pub fn lower(self) -> Option<Self> {
        match self {
            Tier::Common => None,
            Tier::Luxury => Some(Tier::Master),
            other => Self::from_index(other.index() - 1),
        }
    }

    /// The next rollable tier up, or `None` at Master.
    pub fn higher(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Raise by `steps`, saturating at Master.
    pub fn raised(self, steps: u32) -> Self {
        let target = (self.index() + steps as usize).min(Tier::Master.index());
        Self::from_index(target).unwrap_or(Tier::Master)
    }

    /// How many steps remain before Master.
    pub fn headroom(self) -> u32 {
        Tier::Master.index().saturating_sub(self.index()) as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Common => "common",
            Tier::Great => "great",
            Tier::Ultra => "ultra",
            Tier::Rogue => "rogue",
            Tier::Master => "master",
            Tier::Luxury => "luxury",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reward source. Each kind owns its own pool and threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Player,
    Wild,
    Trainer,
    EnemyBuff,
    DailyStarter,
}

impl PoolKind {
    pub const ALL: [PoolKind; 5] = [
        PoolKind::Player,
        PoolKind::Wild,
        PoolKind::Trainer,
        PoolKind::EnemyBuff,
        PoolKind::DailyStarter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PoolKind::Player => "player",
            PoolKind::Wild => "wild",
            PoolKind::Trainer => "trainer",
            PoolKind::EnemyBuff => "enemy_buff",
            PoolKind::DailyStarter => "daily_starter",
        }
    }

    /// Only the player-facing pool is luck-sensitive.
    pub fn is_player_facing(self) -> bool {
        matches!(self, PoolKind::Player)
    }

    /// Whose held modifiers cap this pool's entries.
    pub fn ledger_side(self) -> Side {
        if self.is_player_facing() {
            Side::Player
        } else {
            Side::Enemy
        }
    }

    /// Pools searched, in order, when inferring an item's tier.
    pub fn inference_order(self) -> &'static [PoolKind] {
        match self {
            PoolKind::Player => &[PoolKind::Player, PoolKind::Trainer, PoolKind::Wild],
            PoolKind::Wild => &[PoolKind::Wild, PoolKind::Player, PoolKind::Trainer],
            PoolKind::Trainer => &[PoolKind::Trainer, PoolKind::Player, PoolKind::Wild],
            PoolKind::EnemyBuff => &[PoolKind::EnemyBuff],
            PoolKind::DailyStarter => &[PoolKind::DailyStarter],
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "player" => Some(Side::Player),
            "enemy" => Some(Side::Enemy),
            _ => None,
        }
    }
}

/// Elemental type. `Stellar` exists only as a tera type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PokemonType {
    #[default]
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Stellar,
}

impl PokemonType {
    /// The eighteen battle types, in canonical order.
    pub const STANDARD: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fighting,
        PokemonType::Flying,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Rock,
        PokemonType::Bug,
        PokemonType::Ghost,
        PokemonType::Steel,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Grass,
        PokemonType::Electric,
        PokemonType::Psychic,
        PokemonType::Ice,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Fairy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PokemonType::Normal => "Normal",
            PokemonType::Fighting => "Fighting",
            PokemonType::Flying => "Flying",
            PokemonType::Poison => "Poison",
            PokemonType::Ground => "Ground",
            PokemonType::Rock => "Rock",
            PokemonType::Bug => "Bug",
            PokemonType::Ghost => "Ghost",
            PokemonType::Steel => "Steel",
            PokemonType::Fire => "Fire",
            PokemonType::Water => "Water",
            PokemonType::Grass => "Grass",
            PokemonType::Electric => "Electric",
            PokemonType::Psychic => "Psychic",
            PokemonType::Ice => "Ice",
            PokemonType::Dragon => "Dragon",
            PokemonType::Dark => "Dark",
            PokemonType::Fairy => "Fairy",
            PokemonType::Stellar => "Stellar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    #[default]
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    Poison,
    Toxic,
    Paralysis,
    Sleep,
    Freeze,
    Burn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pokeball {
    Poke,
    Great,
    Ultra,
    Rogue,
    Master,
}

/// Run mode flags the weight tables care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Classic,
    Endless,
    SplicedEndless,
    Daily,
    Challenge,
}

impl GameMode {
    /// Challenge runs follow the classic wave structure.
    pub fn is_classic(self) -> bool {
        matches!(self, GameMode::Classic | GameMode::Challenge)
    }

    pub fn is_endless(self) -> bool {
        matches!(self, GameMode::Endless | GameMode::SplicedEndless)
    }

    pub fn is_spliced_only(self) -> bool {
        matches!(self, GameMode::SplicedEndless)
    }

    pub fn is_daily(self) -> bool {
        matches!(self, GameMode::Daily)
    }
}
