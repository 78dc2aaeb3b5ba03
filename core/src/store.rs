//! SQLite persistence layer.
//!
//! RULE: Only this module issues SQL. Sessions and tools go through
//! `RewardStore` for every read and write.

use crate::{
    error::RewardResult,
    event::RewardLogEntry,
    ledger::{HeldStack, InMemoryLedger},
    types::{ScreenIndex, Side},
};
use rusqlite::{params, Connection};

/// Sentinel stored in `held_modifier.holder` for run-wide stacks.
const GLOBAL_HOLDER: i64 = -1;

pub struct RewardStore {
    pub conn: Connection,
}

impl RewardStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &str) -> RewardResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RewardResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RewardResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_reward_log.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> RewardResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, 0i64],
        )?;
        Ok(())
    }

    pub fn run_seed(&self, run_id: &str) -> RewardResult<Option<u64>> {
        let mut stmt = self.conn.prepare("SELECT seed FROM run WHERE run_id = ?1")?;
        let mut rows = stmt.query_map(params![run_id], |row| row.get::<_, i64>(0))?;
        let seed = rows.next().transpose()?;
        Ok(seed.map(|seed| seed as u64))
    }

    // ── Reward log ─────────────────────────────────────────────

    pub fn append_reward(&self, entry: &RewardLogEntry) -> RewardResult<()> {
        self.conn.execute(
            "INSERT INTO reward_log (run_id, screen, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.run_id, entry.screen as i64, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    pub fn rewards_for_screen(&self, run_id: &str, screen: ScreenIndex) -> RewardResult<Vec<RewardLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, screen, event_type, payload
             FROM reward_log WHERE run_id = ?1 AND screen = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id, screen as i64], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// The whole log of a run, oldest first.
    pub fn reward_log(&self, run_id: &str) -> RewardResult<Vec<RewardLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, screen, event_type, payload
             FROM reward_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Held modifiers ─────────────────────────────────────────

    pub fn upsert_held_modifier(
        &self,
        run_id: &str,
        side: Side,
        item_id: &str,
        stack: HeldStack,
    ) -> RewardResult<()> {
        let holder = stack.holder.map_or(GLOBAL_HOLDER, i64::from);
        self.conn.execute(
            "INSERT INTO held_modifier (run_id, side, item_id, holder, stack_count, max_stack)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (run_id, side, item_id, holder)
             DO UPDATE SET stack_count = excluded.stack_count, max_stack = excluded.max_stack",
            params![run_id, side.as_str(), item_id, holder, stack.stack_count, stack.max_stack],
        )?;
        Ok(())
    }

    pub fn held_modifiers(&self, run_id: &str) -> RewardResult<Vec<(Side, String, HeldStack)>> {
        let mut stmt = self.conn.prepare(
            "SELECT side, item_id, holder, stack_count, max_stack
             FROM held_modifier WHERE run_id = ?1
             ORDER BY side, item_id, holder",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                let side: String = row.get(0)?;
                let holder: i64 = row.get(2)?;
                Ok((
                    side,
                    row.get::<_, String>(1)?,
                    HeldStack {
                        holder: u32::try_from(holder).ok(),
                        stack_count: row.get(3)?,
                        max_stack: row.get(4)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows
            .into_iter()
            .filter_map(|(side, item_id, stack)| Side::parse(&side).map(|s| (s, item_id, stack)))
            .collect())
    }

    /// Rebuild the in-memory ledger the engine reads from.
    pub fn load_ledger(&self, run_id: &str) -> RewardResult<InMemoryLedger> {
        let mut ledger = InMemoryLedger::new();
        for (side, item_id, stack) in self.held_modifiers(run_id)? {
            ledger.add(side, item_id, stack);
        }
        Ok(ledger)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RewardLogEntry> {
    Ok(RewardLogEntry {
        id: Some(row.get(0)?),
        run_id: row.get(1)?,
        screen: row.get::<_, i64>(2)? as u64,
        event_type: row.get(3)?,
        payload: row.get(4)?,
    })
}
