use crate::types::{PoolKind, Tier};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pool '{pool}' has no selectable entries at or below tier {tier}")]
    EmptyTier { pool: PoolKind, tier: Tier },

    #[error("Pool '{pool}' has no entries")]
    EmptyPool { pool: PoolKind },

    #[error("Thresholds for pool '{pool}' were not built for this reward screen")]
    ThresholdsNotBuilt { pool: PoolKind },

    #[error("Generator '{kind}' in pool '{pool}' produced nothing after {retries} retries at tier {tier}")]
    GeneratorExhausted {
        pool: PoolKind,
        tier: Tier,
        kind: String,
        retries: u32,
    },

    #[error("Unknown item kind '{id}'")]
    UnknownItemKind { id: String },

    #[error("Pool '{pool}' cannot serve {operation}")]
    WrongPool { pool: PoolKind, operation: &'static str },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RewardError {
    /// Data-authoring faults: the engine cannot recover by retrying.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            RewardError::EmptyTier { .. }
                | RewardError::EmptyPool { .. }
                | RewardError::GeneratorExhausted { .. }
                | RewardError::UnknownItemKind { .. }
                | RewardError::InvalidConfig(_)
        )
    }
}

pub type RewardResult<T> = Result<T, RewardError>;
