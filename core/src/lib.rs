//! Reward Pool Engine: weighted, tiered, luck-escalated reward draws
//! with a fixed RNG draw order.

pub mod catalog;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod error;
pub mod event;
pub mod generators;
pub mod item;
pub mod ledger;
pub mod offers;
pub mod party;
pub mod pools;
pub mod rng;
pub mod selector;
pub mod session;
pub mod shop;
pub mod store;
pub mod thresholds;
pub mod types;
pub mod weights;
