//! Action dispatch.
//!
//! [`Editor`] ties the form, the in-memory log and storage together. Every
//! user action goes through [`Editor::dispatch`]; actions that change the
//! log write it back in full and hand back a freshly rendered table.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::form::{FormField, RunForm};
use crate::log::RunLog;
use crate::render::{render, Action, ControlId, RunTable};
use crate::run::Run;
use crate::storage::{RunStorage, SlotStore};

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The form was stored at `id`; the form is cleared.
    Saved {
        /// Position the run was stored at.
        id: usize,
        /// Whether the run was appended rather than replaced.
        appended: bool,
        /// The list after the change.
        table: RunTable,
    },
    /// The form was cleared.
    Cleared,
    /// The run at `id` was loaded into the form.
    Loaded {
        /// Position of the loaded run.
        id: usize,
    },
    /// The run at `id` was removed.
    Deleted {
        /// Position the run occupied.
        id: usize,
        /// The list after the change.
        table: RunTable,
    },
}

/// The run-log editor: a form, the log, and the slot the log lives in.
#[derive(Debug)]
pub struct Editor<S> {
    log: RunLog,
    form: RunForm,
    storage: RunStorage<S>,
    default_run: Run,
    unit_options: Vec<String>,
    slot_checked: bool,
}

impl<S: SlotStore> Editor<S> {
    /// Load the log from storage and show `default_run` on the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot store cannot be read.
    pub fn open(storage: RunStorage<S>, default_run: Run) -> Result<Self> {
        let log = RunLog::from_runs(storage.load()?);
        info!("Loaded {} runs", log.len());
        Ok(Self {
            log,
            form: RunForm::with_run(&default_run),
            storage,
            default_run,
            unit_options: Vec::new(),
            slot_checked: false,
        })
    }

    /// Limit saved runs to these units, like a selector would. An empty
    /// list accepts any unit.
    #[must_use]
    pub fn with_unit_options(mut self, options: Vec<String>) -> Self {
        self.unit_options = options;
        self
    }

    /// Units a saved run may carry; empty means any.
    #[must_use]
    pub fn unit_options(&self) -> &[String] {
        &self.unit_options
    }

    /// The runs currently held.
    #[must_use]
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// The form as it stands.
    #[must_use]
    pub fn form(&self) -> &RunForm {
        &self.form
    }

    /// The form, for editing field values.
    pub fn form_mut(&mut self) -> &mut RunForm {
        &mut self.form
    }

    /// The storage adapter.
    #[must_use]
    pub fn storage(&self) -> &RunStorage<S> {
        &self.storage
    }

    /// Render the current list.
    #[must_use]
    pub fn table(&self) -> RunTable {
        render(&self.log)
    }

    /// Carry out one action.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidField`](crate::Error::InvalidField) when saving a
    ///   form that does not read as a run, or whose unit is not one of the
    ///   unit options.
    /// - [`Error::InvalidId`](crate::Error::InvalidId) when the action names
    ///   a position with no run.
    /// - Storage errors when persisting.
    ///
    /// A rejected id or field leaves the log and the form as they were. So
    /// does a failed write: the change is undone in memory.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        debug!("Dispatching {:?}", action);
        match action {
            Action::Save => self.save(),
            Action::New => {
                self.form.reset(&self.default_run);
                Ok(Outcome::Cleared)
            }
            Action::Edit(id) => {
                let run = self.log.get(id)?;
                self.form.load(&run);
                Ok(Outcome::Loaded { id })
            }
            Action::Delete(id) => {
                let before = self.log.clone();
                self.log.remove(id)?;
                self.persist_or_restore(before)?;
                Ok(Outcome::Deleted {
                    id,
                    table: self.table(),
                })
            }
        }
    }

    /// Decode a row control id such as `tb_del_2` and dispatch its action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedControl`](crate::Error::MalformedControl)
    /// if `control` does not name a row control, otherwise whatever
    /// [`dispatch`](Self::dispatch) returns.
    pub fn dispatch_control(&mut self, control: &str) -> Result<Outcome> {
        let control: ControlId = control.trim().parse()?;
        self.dispatch(control.action())
    }

    fn save(&mut self) -> Result<Outcome> {
        let mut run = self.form.read()?;
        run.units = self.selected_unit(&run.units)?;

        let before = self.log.clone();
        let appended = run.is_new();
        let id = if appended {
            self.log.append(run)
        } else {
            self.log.update(run)?
        };

        self.persist_or_restore(before)?;
        self.form.reset(&self.default_run);
        info!("Saved run {}", id);

        Ok(Outcome::Saved {
            id,
            appended,
            table: self.table(),
        })
    }

    /// Match `units` against the options, ignoring case, and return the
    /// option's spelling.
    fn selected_unit(&self, units: &str) -> Result<String> {
        if self.unit_options.is_empty() {
            return Ok(units.to_string());
        }
        self.unit_options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(units.trim()))
            .cloned()
            .ok_or_else(|| Error::invalid_field(FormField::Units.label(), units))
    }

    /// Write the log back. On failure the log returns to `before`.
    fn persist_or_restore(&mut self, before: RunLog) -> Result<()> {
        if let Err(e) = self.persist() {
            warn!("Write failed, keeping the previous {} runs", before.len());
            self.log = before;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        // An undecodable slot loaded as empty; keep a copy before replacing it.
        if !self.slot_checked {
            self.storage.preserve_unreadable()?;
            self.slot_checked = true;
        }
        self.storage.save(self.log.as_slice())
    }
}
