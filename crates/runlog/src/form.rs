//! The run entry form.
//!
//! The form is a set of six labeled fields, each holding the text its input
//! control would show. [`RunForm::load`] fills them from a run and
//! [`RunForm::read`] builds a run back from whatever they hold.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::run::{Run, NEW_RUN_ID};

/// Date format of the date control.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One input control on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Date picker.
    Date,
    /// Distance unit selector.
    Units,
    /// Hidden field carrying the run's position.
    RunId,
    /// Distance number input.
    Distance,
    /// Duration number input.
    Duration,
    /// Comments text area.
    Comments,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [Self; 6] = [
        Self::Date,
        Self::Units,
        Self::RunId,
        Self::Distance,
        Self::Duration,
        Self::Comments,
    ];

    /// The control's label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "rundate",
            Self::Units => "distance_unit",
            Self::RunId => "run_id",
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Comments => "comments",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Units => "units",
            Self::RunId => "id",
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Comments => "comments",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Date => 0,
            Self::Units => 1,
            Self::RunId => 2,
            Self::Distance => 3,
            Self::Duration => 4,
            Self::Comments => 5,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| s.eq_ignore_ascii_case(field.label()) || s.eq_ignore_ascii_case(field.alias()))
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// Values of the six form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunForm {
    values: [String; 6],
}

impl RunForm {
    /// A form showing `run`.
    #[must_use]
    pub fn with_run(run: &Run) -> Self {
        let mut form = Self::default();
        form.load(run);
        form
    }

    /// Write every field of `run` into its control.
    pub fn load(&mut self, run: &Run) {
        self.set(FormField::Date, run.date.format(DATE_FORMAT).to_string());
        self.set(FormField::Units, run.units.clone());
        self.set(FormField::RunId, run.id.to_string());
        self.set(FormField::Distance, run.distance.to_string());
        self.set(FormField::Duration, run.duration.to_string());
        self.set(FormField::Comments, run.comments.clone());
    }

    /// Build a run from the current field values.
    ///
    /// Text fields are taken verbatim. Number fields read as zero when
    /// blank, and a blank id field means an unsaved run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for a date or number that its control
    /// could not hold. Distance and duration must be finite and not
    /// negative.
    pub fn read(&self) -> Result<Run> {
        let date_raw = self.value(FormField::Date);
        let date = NaiveDate::parse_from_str(date_raw.trim(), DATE_FORMAT)
            .map_err(|_| Error::invalid_field(FormField::Date.label(), date_raw))?;

        Ok(Run {
            date,
            id: self.number_or(FormField::RunId, NEW_RUN_ID)?,
            distance: self.measure(FormField::Distance)?,
            units: self.value(FormField::Units).to_string(),
            duration: self.measure(FormField::Duration)?,
            comments: self.value(FormField::Comments).to_string(),
        })
    }

    /// Current text of a field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    /// Replace the text of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Show `default` in every field.
    pub fn reset(&mut self, default: &Run) {
        self.load(default);
    }

    /// Iterate over `(field, value)` pairs in display order.
    pub fn fields(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::ALL.into_iter().map(|f| (f, self.value(f)))
    }

    fn number_or<T: FromStr>(&self, field: FormField, blank: T) -> Result<T> {
        let raw = self.value(field).trim();
        if raw.is_empty() {
            return Ok(blank);
        }
        raw.parse()
            .map_err(|_| Error::invalid_field(field.label(), raw))
    }

    /// A distance or duration. `NaN`, infinities and negatives do not fit
    /// a `min=0` number control.
    fn measure(&self, field: FormField) -> Result<f64> {
        let value = self.number_or(field, 0.0_f64)?;
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Error::invalid_field(field.label(), self.value(field).trim()))
        }
    }
}

impl fmt::Display for RunForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.fields() {
            writeln!(f, "{:<14} {}", format!("{field}:"), value)?;
        }
        Ok(())
    }
}
