use crate::types::Tier;
use serde::{Deserialize, Serialize};

/// Maps one draw in `[0, roll_range)` to a tier.
///
/// Bands are tightest-first: `> common_above` is Common, `> great_above`
/// Great, `> ultra_above` Ultra, any other non-zero value Rogue, and 0 Master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBands {
    pub roll_range: u32,
    pub common_above: u32,
    pub great_above: u32,
    pub ultra_above: u32,
}

impl TierBands {
    /// The global post-battle distribution, 768:195:48:12:1 out of 1024.
    pub fn standard() -> Self {
        Self {
            roll_range: 1024,
            common_above: 255,
            great_above: 60,
            ultra_above: 12,
        }
    }

    /// The daily-run starter distribution out of 64.
    pub fn daily_starter() -> Self {
        Self {
            roll_range: 64,
            common_above: 25,
            great_above: 12,
            ultra_above: 4,
        }
    }

    pub fn tier_for(&self, value: u32) -> Tier {
        if value > self.common_above {
            Tier::Common
        } else if value > self.great_above {
            Tier::Great
        } else if value > self.ultra_above {
            Tier::Ultra
        } else if value > 0 {
            Tier::Rogue
        } else {
            Tier::Master
        }
    }

    /// Number of roll values that land in `tier`.
    pub fn band_width(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Common => self.roll_range.saturating_sub(self.common_above + 1),
            Tier::Great => self.common_above - self.great_above,
            Tier::Ultra => self.great_above - self.ultra_above,
            Tier::Rogue => self.ultra_above,
            Tier::Master => 1,
            Tier::Luxury => 0,
        }
    }

    pub fn probability(&self, tier: Tier) -> f64 {
        self.band_width(tier) as f64 / self.roll_range as f64
    }

    fn validate(&self, label: &str) -> anyhow::Result<()> {
        if !(self.roll_range > self.common_above + 1
            && self.common_above > self.great_above
            && self.great_above > self.ultra_above
            && self.ultra_above > 0)
        {
            anyhow::bail!("{label}: bands must satisfy range > common > great > ultra > 0, got {:?}", self);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckConfig {
    pub max_luck: u32,
    /// Escalation odds are `floor(numerator / ((luck + 4) / 4))`.
    pub upgrade_numerator: u32,
    /// A roll strictly below this counts as one upgrade.
    pub upgrade_threshold: u32,
    /// Pinned-tier odds are `floor(numerator / ((shiny + 2) / 2))`.
    pub pinned_upgrade_numerator: u32,
}

impl LuckConfig {
    pub fn upgrade_odds(&self, luck: u32) -> u32 {
        let divisor = (luck as f64 + 4.0) / 4.0;
        (self.upgrade_numerator as f64 / divisor).floor() as u32
    }

    pub fn pinned_upgrade_odds(&self, shiny_count: u32) -> u32 {
        let divisor = (shiny_count as f64 + 2.0) / 2.0;
        (self.pinned_upgrade_numerator as f64 / divisor).floor() as u32
    }
}

impl Default for LuckConfig {
    fn default() -> Self {
        Self {
            max_luck: 14,
            upgrade_numerator: 128,
            upgrade_threshold: 4,
            pinned_upgrade_numerator: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Null generations tolerated per tier before stepping down.
    pub generator_cap: u32,
    pub offer_per_slot: u32,
    pub offer_cap: u32,
    pub enemy_buff_cap: u32,
    /// Attempts that must fit the full tier grant before a single stack suffices.
    pub enemy_buff_full_grant_window: u32,
}

impl RetryConfig {
    /// Collision redraws allowed per slot for an `count`-offer screen.
    pub fn offer_retry_cap(&self, count: usize) -> u32 {
        (count as u32).saturating_mul(self.offer_per_slot).min(self.offer_cap)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            generator_cap: 10,
            offer_per_slot: 5,
            offer_cap: 50,
            enemy_buff_cap: 50,
            enemy_buff_full_grant_window: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyBuffStacks {
    pub ultra: u32,
    pub great: u32,
    pub default: u32,
}

impl EnemyBuffStacks {
    pub fn for_tier(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Ultra => self.ultra,
            Tier::Great => self.great,
            _ => self.default,
        }
    }
}

impl Default for EnemyBuffStacks {
    fn default() -> Self {
        Self {
            ultra: 5,
            great: 3,
            default: 1,
        }
    }
}

/// Every tunable the engine reads. Loaded from
/// `{data_dir}/rewards/engine_config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tier_bands: TierBands,
    pub daily_starter_bands: TierBands,
    #[serde(default)]
    pub luck: LuckConfig,
    #[serde(default)]
    pub retries: RetryConfig,
    #[serde(default)]
    pub enemy_buff_stacks: EnemyBuffStacks,
    pub daily_starter_items_per_member: u32,
    pub mini_black_hole_wave_interval: u32,
    pub last_classic_wave: u32,
    pub shop_wave_span: u32,
    pub shop_closed_every: u32,
    pub max_per_type_pokeballs: u32,
    #[serde(default)]
    pub use_max_weight_for_output: bool,
    #[serde(default)]
    pub log_odds_table: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tier_bands: TierBands::standard(),
            daily_starter_bands: TierBands::daily_starter(),
            luck: LuckConfig::default(),
            retries: RetryConfig::default(),
            enemy_buff_stacks: EnemyBuffStacks::default(),
            daily_starter_items_per_member: 3,
            mini_black_hole_wave_interval: 1000,
            last_classic_wave: 199,
            shop_wave_span: 30,
            shop_closed_every: 10,
            max_per_type_pokeballs: 99,
            use_max_weight_for_output: false,
            log_odds_table: false,
        }
    }
}

impl EngineConfig {
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/rewards/engine_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults for unit and integration tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.tier_bands.validate("tier_bands")?;
        self.daily_starter_bands.validate("daily_starter_bands")?;
        if self.luck.upgrade_odds(self.luck.max_luck) <= self.luck.upgrade_threshold {
            anyhow::bail!(
                "luck: odds at max luck ({}) must exceed the upgrade threshold ({})",
                self.luck.upgrade_odds(self.luck.max_luck),
                self.luck.upgrade_threshold
            );
        }
        if self.retries.generator_cap == 0 {
            anyhow::bail!("retries.generator_cap must be at least 1");
        }
        if self.mini_black_hole_wave_interval == 0 || self.shop_closed_every == 0 || self.shop_wave_span == 0 {
            anyhow::bail!("wave intervals must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bands_cover_the_documented_ratio() {
        let bands = TierBands::standard();
        let widths: Vec<u32> = Tier::ROLLABLE.iter().map(|t| bands.band_width(*t)).collect();
        assert_eq!(widths, vec![768, 195, 48, 12, 1]);
    }

    #[test]
    fn luck_odds_shrink_with_luck() {
        let luck = LuckConfig::default();
        assert_eq!(luck.upgrade_odds(0), 128);
        assert_eq!(luck.upgrade_odds(14), 28);
        assert_eq!(luck.pinned_upgrade_odds(0), 32);
        assert_eq!(luck.pinned_upgrade_odds(2), 16);
    }

    #[test]
    fn offer_retry_cap_is_bounded() {
        let retries = RetryConfig::default();
        assert_eq!(retries.offer_retry_cap(3), 15);
        assert_eq!(retries.offer_retry_cap(20), 50);
    }

    #[test]
    fn malformed_bands_are_rejected() {
        let mut config = EngineConfig::default_test();
        config.tier_bands.great_above = 300;
        assert!(config.validate().is_err());
    }
}
