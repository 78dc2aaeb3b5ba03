//! Deterministic random number generation.
//!
//! RULE: The engine never owns randomness. Every draw goes through a
//! `RewardRng` handed in by the caller, and the order of draws is part
//! of the save/replay contract:
//!   - tier roll, then luck escalation rolls, then the slot roll,
//!     then at most one generator roll per resolution.
//!   - no draw is added, skipped or reordered between releases.
//!
//! `SessionRng` is the production stream. `ScriptedRng` and
//! `RecordingRng` exist so callers can replay or audit a sequence.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

/// A shared, order-sensitive integer stream.
pub trait RewardRng {
    /// Draw an integer in `[0, bound)`. A bound of 0 still consumes a
    /// draw and yields 0.
    fn next_int(&mut self, bound: u32, label: &'static str) -> u32;
}

impl<R: RewardRng + ?Sized> RewardRng for &mut R {
    fn next_int(&mut self, bound: u32, label: &'static str) -> u32 {
        (**self).next_int(bound, label)
    }
}

/// The seeded stream owned by a reward session.
pub struct SessionRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
    draws: u64,
}

impl SessionRng {
    /// Create a stream from the master seed and a stable slot.
    /// The slot index must never change once assigned.
    pub fn new(master_seed: u64, slot: StreamSlot) -> Self {
        let derived_seed = master_seed ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: slot.name(),
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
            draws: 0,
        }
    }

    /// Number of values consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RewardRng for SessionRng {
    fn next_int(&mut self, bound: u32, label: &'static str) -> u32 {
        let raw = self.inner.next_u64();
        self.draws += 1;
        let value = if bound == 0 {
            0
        } else {
            (raw % u64::from(bound)) as u32
        };
        log::trace!("rng={} draw={} bound={bound} value={value} ({label})", self.name, self.draws);
        value
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Rewards = 0,
    PartySynthesis = 1,
    // Add new streams here, append only.
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rewards => "rewards",
            Self::PartySynthesis => "party_synthesis",
        }
    }
}

/// One consumed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawRecord {
    pub bound: u32,
    pub value: u32,
    pub label: &'static str,
}

/// Replays a fixed sequence. Each raw value is reduced modulo the
/// requested bound.
///
/// Drawing past the end of the script panics: a short script would
/// otherwise feed zeros into the escalation loops forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
    draws: Vec<DrawRecord>,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.cursor)
    }
}

impl RewardRng for ScriptedRng {
    fn next_int(&mut self, bound: u32, label: &'static str) -> u32 {
        let Some(raw) = self.values.get(self.cursor).copied() else {
            panic!(
                "scripted rng exhausted after {} draws (next: bound={bound} {label})",
                self.values.len()
            );
        };
        self.cursor += 1;
        let value = if bound == 0 { 0 } else { raw % bound };
        self.draws.push(DrawRecord { bound, value, label });
        value
    }
}

/// Wraps any stream and records every draw it serves.
pub struct RecordingRng<R> {
    inner: R,
    records: Vec<DrawRecord>,
}

impl<R: RewardRng> RecordingRng<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (R, Vec<DrawRecord>) {
        (self.inner, self.records)
    }
}

impl<R: RewardRng> RewardRng for RecordingRng<R> {
    fn next_int(&mut self, bound: u32, label: &'static str) -> u32 {
        let value = self.inner.next_int(bound, label);
        self.records.push(DrawRecord { bound, value, label });
        value
    }
}
