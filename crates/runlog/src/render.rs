//! List rendering.
//!
//! [`render`] projects the run log into a [`RunTable`]: a header row and one
//! row per run, each row carrying edit and delete controls. Controls hold the
//! [`Action`] they trigger directly; their encoded id (`tb_edit_3`) exists so
//! a control can be named from a text prompt.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::log::RunLog;

/// Column headings of the run table.
pub const HEADER: [&str; 5] = ["ID", "Date", "Distance", "Duration", ""];

/// Something the user can ask the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "index", rename_all = "snake_case")]
pub enum Action {
    /// Store the form as a new or edited run.
    Save,
    /// Clear the form.
    New,
    /// Load the run at the position into the form.
    Edit(usize),
    /// Delete the run at the position.
    Delete(usize),
}

/// Encoded identifier of a row control, `tb_<edit|del>_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlId(Action);

impl ControlId {
    /// The action the control triggers.
    #[must_use]
    pub fn action(self) -> Action {
        self.0
    }

    /// Control for a row action. `None` for actions that are not per-row.
    #[must_use]
    pub fn for_action(action: Action) -> Option<Self> {
        matches!(action, Action::Edit(_) | Action::Delete(_)).then_some(Self(action))
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Action::Edit(i) => write!(f, "tb_edit_{i}"),
            Action::Delete(i) => write!(f, "tb_del_{i}"),
            Action::Save | Action::New => unreachable!("only row actions have controls"),
        }
    }
}

impl FromStr for ControlId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || Error::malformed_control(s);

        let mut parts = s.splitn(3, '_');
        if parts.next() != Some("tb") {
            return Err(malformed());
        }
        let kind = parts.next().ok_or_else(malformed)?;
        let index: usize = parts
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(malformed)?;

        match kind {
            "edit" => Ok(Self(Action::Edit(index))),
            "del" => Ok(Self(Action::Delete(index))),
            _ => Err(malformed()),
        }
    }
}

impl Serialize for ControlId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One run as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRow {
    /// Position in the log.
    pub id: usize,
    /// Formatted date.
    pub date: String,
    /// Distance and unit, e.g. `5 Km`.
    pub distance: String,
    /// Duration as entered.
    pub duration: String,
    /// Edit control.
    pub edit: ControlId,
    /// Delete control.
    pub delete: ControlId,
}

impl RunRow {
    fn cells(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.date.clone(),
            self.distance.clone(),
            self.duration.clone(),
            format!("[{}] [{}]", self.edit, self.delete),
        ]
    }
}

/// The rendered run list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTable {
    /// One row per run, in log order.
    pub rows: Vec<RunRow>,
}

impl RunTable {
    /// Number of run rows, not counting the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no run rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header cells followed by each row's cells.
    #[must_use]
    pub fn cells(&self) -> Vec<[String; 5]> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(HEADER.map(str::to_string));
        out.extend(self.rows.iter().map(RunRow::cells));
        out
    }

    /// One line per run, without alignment or controls.
    #[must_use]
    pub fn to_plain(&self) -> String {
        self.rows
            .iter()
            .map(|r| format!("{}\t{}\t{}\t{}\n", r.id, r.date, r.distance, r.duration))
            .collect()
    }
}

impl fmt::Display for RunTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells();
        let mut widths = [0usize; 5];
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        for row in &cells {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Build the table for the current log.
#[must_use]
pub fn render(log: &RunLog) -> RunTable {
    let rows = log
        .iter()
        .map(|(i, run)| RunRow {
            id: i,
            date: run.date.format("%Y-%m-%d").to_string(),
            distance: run.distance_label(),
            duration: run.duration.to_string(),
            edit: ControlId(Action::Edit(i)),
            delete: ControlId(Action::Delete(i)),
        })
        .collect();
    RunTable { rows }
}
