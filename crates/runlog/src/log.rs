//! The in-memory run log.
//!
//! An ordered list of runs where a run's position is its identity. Removing
//! a run shifts every later run down by one, so ids handed out earlier go
//! stale; [`RunLog::get`] always reports the position it was asked for.

use tracing::trace;

use crate::error::{Error, Result};
use crate::run::Run;

/// Ordered collection of runs, addressed by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLog {
    runs: Vec<Run>,
}

impl RunLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from runs in stored order.
    #[must_use]
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Give back the runs in order.
    #[must_use]
    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    /// The runs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the log holds no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterate over `(position, run)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Run)> {
        self.runs.iter().enumerate()
    }

    /// Append a run at the end and return its position.
    ///
    /// Whatever id the run carried is replaced by that position.
    pub fn append(&mut self, mut run: Run) -> usize {
        let id = self.runs.len();
        run.id = position_to_id(id);
        self.runs.push(run);
        trace!("Appended run at {}", id);
        id
    }

    /// Replace the run at `run.id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if `run.id` is not an occupied position.
    /// The log is unchanged in that case.
    pub fn update(&mut self, run: Run) -> Result<usize> {
        let id = self.position(run.id)?;
        self.runs[id] = run;
        trace!("Updated run at {}", id);
        Ok(id)
    }

    /// Fetch a copy of the run at `id`, with its id set to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if nothing is stored at `id`.
    pub fn get(&self, id: usize) -> Result<Run> {
        let mut run = self.runs.get(id).cloned().ok_or_else(|| Error::invalid_id(id))?;
        run.id = position_to_id(id);
        Ok(run)
    }

    /// Remove the run at `id`, shifting later runs down by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if `id` is past the end. Nothing is
    /// removed in that case.
    pub fn remove(&mut self, id: usize) -> Result<usize> {
        if id >= self.runs.len() {
            return Err(Error::invalid_id(id));
        }
        self.runs.remove(id);
        trace!("Removed run at {}", id);
        Ok(id)
    }

    fn position(&self, id: i64) -> Result<usize> {
        usize::try_from(id)
            .ok()
            .filter(|&i| i < self.runs.len())
            .ok_or_else(|| Error::invalid_id(id))
    }
}

fn position_to_id(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
