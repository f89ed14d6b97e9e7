//! Storage layer for runlog.
//!
//! The run log is persisted the simple way: the whole collection is
//! serialized to JSON and written into one named slot of a string-keyed
//! store, and read back wholesale on startup.
//!
//! - [`SlotStore`] is the string-keyed store itself.
//! - [`SqliteSlotStore`] keeps slots in a `SQLite` database.
//! - [`MemorySlotStore`] keeps them in a map, for tests and dry runs.
//! - [`RunStorage`] maps a run collection onto one slot.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

pub use memory::MemorySlotStore;
pub use sqlite::SqliteSlotStore;

use tracing::{debug, warn};

use crate::error::Result;
use crate::run::Run;

/// Default slot holding the run collection.
pub const DEFAULT_SLOT_KEY: &str = "run_db";

/// Suffix of the slot an undecodable collection is copied to.
const UNREADABLE_SUFFIX: &str = ".unreadable";

/// A persistent store of named string slots.
///
/// Every write replaces the slot's previous contents in full.
pub trait SlotStore {
    /// Read a slot, or `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a slot. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// List the names of all slots, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Loads and saves a run collection as JSON in one slot.
#[derive(Debug)]
pub struct RunStorage<S> {
    store: S,
    key: String,
}

impl<S: SlotStore> RunStorage<S> {
    /// Wrap a slot store, using `key` as the collection's slot.
    #[must_use]
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Name of the slot holding the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying slot store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the whole collection.
    ///
    /// A missing slot, a `null` slot, and a slot that does not decode as a
    /// run list all load as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error only if the slot store itself fails.
    pub fn load(&self) -> Result<Vec<Run>> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("Slot '{}' is empty, starting with no runs", self.key);
            return Ok(Vec::new());
        };

        match decode(&raw) {
            Ok(runs) => {
                debug!("Loaded {} runs from slot '{}'", runs.len(), self.key);
                Ok(runs)
            }
            Err(e) => {
                warn!(
                    "Slot '{}' does not hold a run list ({}), starting with no runs",
                    self.key, e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Write the whole collection, replacing the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    pub fn save(&mut self, runs: &[Run]) -> Result<()> {
        let raw = serde_json::to_string(runs)?;
        self.store.set(&self.key, &raw)?;
        debug!("Saved {} runs to slot '{}'", runs.len(), self.key);
        Ok(())
    }

    /// Slot an undecodable collection is copied to before it is overwritten.
    #[must_use]
    pub fn backup_key(&self) -> String {
        format!("{}{UNREADABLE_SUFFIX}", self.key)
    }

    /// Copy the slot to [`backup_key`](Self::backup_key) if it holds
    /// something that does not decode as a run list.
    ///
    /// Returns the backup slot's name when a copy was made.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot store fails.
    pub fn preserve_unreadable(&mut self) -> Result<Option<String>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        if decode(&raw).is_ok() {
            return Ok(None);
        }

        let backup = self.backup_key();
        self.store.set(&backup, &raw)?;
        warn!(
            "Slot '{}' could not be read; its contents were kept in '{}'",
            self.key, backup
        );
        Ok(Some(backup))
    }

    /// The slot's raw contents, unparsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot store fails.
    pub fn load_raw(&self) -> Result<Option<String>> {
        self.store.get(&self.key)
    }

    /// Replace the collection with the runs decoded from `raw`.
    ///
    /// Unlike [`load`](Self::load), undecodable input is an error here, and
    /// the slot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a run list or the write fails.
    pub fn import(&mut self, raw: &str) -> Result<usize> {
        let runs: Vec<Run> = serde_json::from_str(raw)?;
        self.save(&runs)?;
        Ok(runs.len())
    }

    /// Remove the slot entirely. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot store fails.
    pub fn clear(&mut self) -> Result<bool> {
        self.store.remove(&self.key)
    }
}

fn decode(raw: &str) -> serde_json::Result<Vec<Run>> {
    serde_json::from_str::<Option<Vec<Run>>>(raw).map(Option::unwrap_or_default)
}
