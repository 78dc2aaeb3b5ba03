//! Read-only view of modifiers already held.
//!
//! The engine never writes holdings. It only asks "how many of this
//! kind does this side hold, and can any stack grow?"

use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One held stack of an item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldStack {
    /// Battler holding the stack; `None` for run-wide items.
    pub holder: Option<u32>,
    pub stack_count: u32,
    pub max_stack: u32,
}

impl HeldStack {
    pub fn global(stack_count: u32, max_stack: u32) -> Self {
        Self {
            holder: None,
            stack_count,
            max_stack,
        }
    }

    pub fn has_room(&self) -> bool {
        self.stack_count < self.max_stack
    }
}

pub trait ModifierLedger {
    /// Every stack of `item_id` held by `side`.
    fn stacks(&self, item_id: &str, side: Side) -> Vec<HeldStack>;

    fn holds(&self, item_id: &str, side: Side) -> bool {
        !self.stacks(item_id, side).is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    entries: BTreeMap<(Side, String), Vec<HeldStack>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, side: Side, item_id: impl Into<String>, stack: HeldStack) {
        self.entries.entry((side, item_id.into())).or_default().push(stack);
    }

    pub fn with(mut self, side: Side, item_id: &str, stack: HeldStack) -> Self {
        self.add(side, item_id, stack);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModifierLedger for InMemoryLedger {
    fn stacks(&self, item_id: &str, side: Side) -> Vec<HeldStack> {
        self.entries
            .get(&(side, item_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
