//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::form::{FormField, RunForm};

/// Form field values given on the command line.
///
/// Values are typed into the form as-is; the form decides what they mean
/// when the run is saved.
#[derive(Debug, Default, Args)]
pub struct RunFields {
    /// Date of the run (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Distance covered
    #[arg(short = 'n', long)]
    pub distance: Option<String>,

    /// Distance unit, one of the configured unit options (e.g. Km, Mi)
    #[arg(short, long)]
    pub units: Option<String>,

    /// Duration in minutes
    #[arg(short = 't', long)]
    pub duration: Option<String>,

    /// Free-text comments
    #[arg(short = 'm', long)]
    pub comments: Option<String>,
}

impl RunFields {
    /// Type every given value into its form field.
    pub fn apply(&self, form: &mut RunForm) {
        let given = [
            (FormField::Date, &self.date),
            (FormField::Distance, &self.distance),
            (FormField::Units, &self.units),
            (FormField::Duration, &self.duration),
            (FormField::Comments, &self.comments),
        ];
        for (field, value) in given {
            if let Some(value) = value {
                form.set(field, value.clone());
            }
        }
    }

    /// Whether no field was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.distance.is_none()
            && self.units.is_none()
            && self.duration.is_none()
            && self.comments.is_none()
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Values for the new run; omitted fields keep the cleared form's value
    #[command(flatten)]
    pub fields: RunFields,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the run, as shown by `list`
    pub id: usize,

    /// Fields to change; omitted fields keep their stored value
    #[command(flatten)]
    pub fields: RunFields,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the run, as shown by `list`
    pub id: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the run, as shown by `list`
    pub id: usize,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Shell command arguments.
#[derive(Debug, Args)]
pub struct ShellCommand {
    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file holding a run list
    pub file: PathBuf,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain tab-separated text
    Plain,
    /// Aligned table with row controls
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::Run;

    #[test]
    fn test_run_fields_apply() {
        let mut form = RunForm::with_run(&Run::blank("Km"));
        let fields = RunFields {
            date: Some("2024-02-03".to_string()),
            distance: Some("12".to_string()),
            units: None,
            duration: None,
            comments: Some("long".to_string()),
        };
        fields.apply(&mut form);

        assert_eq!(form.value(FormField::Date), "2024-02-03");
        assert_eq!(form.value(FormField::Distance), "12");
        assert_eq!(form.value(FormField::Units), "Km");
        assert_eq!(form.value(FormField::Duration), "0");
        assert_eq!(form.value(FormField::Comments), "long");
    }

    #[test]
    fn test_run_fields_is_empty() {
        assert!(RunFields::default().is_empty());
        let fields = RunFields {
            units: Some("Mi".to_string()),
            ..RunFields::default()
        };
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
