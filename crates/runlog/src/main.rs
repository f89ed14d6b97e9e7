//! `runlog` - CLI for the run log
//!
//! This binary provides the command-line interface for adding, listing,
//! editing and deleting runs.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;

use runlog::cli::{Cli, Command, ConfigCommand, OutputFormat, RunFields};
use runlog::shell::{self, ShellOptions};
use runlog::{init_logging, Action, Config, Editor, Outcome, RunStorage, SlotStore, SqliteSlotStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::List(cmd) => handle_list(&config, cmd.format),
        Command::Add(cmd) => handle_add(&config, &cmd.fields),
        Command::Edit(cmd) => handle_edit(&config, cmd.id, &cmd.fields),
        Command::Show(cmd) => handle_show(&config, cmd.id, cmd.json),
        Command::Delete(cmd) => handle_delete(&config, cmd.id, cmd.yes),
        Command::Shell(cmd) => handle_shell(&config, cmd.yes),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Export => handle_export(&config),
        Command::Import(cmd) => {
            let raw = std::fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            let count = open_storage(&config)?.import(&raw)?;
            println!("Imported {count} runs.");
            Ok(())
        }
        Command::Reset(cmd) => handle_reset(&config, cmd.yes),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<RunStorage<SqliteSlotStore>> {
    let store = SqliteSlotStore::open(config.database_path())?;
    Ok(RunStorage::new(store, config.storage.slot_key.clone()))
}

fn open_editor(config: &Config) -> anyhow::Result<Editor<SqliteSlotStore>> {
    let editor = Editor::open(open_storage(config)?, config.default_run())?;
    Ok(editor.with_unit_options(config.form.units.clone()))
}

fn handle_list(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let table = open_editor(config)?.table();
    match format {
        OutputFormat::Plain => print!("{}", table.to_plain()),
        OutputFormat::Table => print!("{table}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    Ok(())
}

fn handle_add(config: &Config, fields: &RunFields) -> anyhow::Result<()> {
    let mut editor = open_editor(config)?;
    editor.dispatch(Action::New)?;
    fields.apply(editor.form_mut());
    report_save(editor.dispatch(Action::Save)?);
    Ok(())
}

fn handle_edit(config: &Config, id: usize, fields: &RunFields) -> anyhow::Result<()> {
    let mut editor = open_editor(config)?;
    editor.dispatch(Action::Edit(id))?;
    if fields.is_empty() {
        println!("Nothing to change. Give at least one field, e.g. --comments.");
        return Ok(());
    }
    fields.apply(editor.form_mut());
    report_save(editor.dispatch(Action::Save)?);
    Ok(())
}

fn report_save(outcome: Outcome) {
    if let Outcome::Saved { id, appended, .. } = outcome {
        let verb = if appended { "Added" } else { "Updated" };
        println!("{verb} run {id}.");
    }
}

fn handle_show(config: &Config, id: usize, json: bool) -> anyhow::Result<()> {
    let mut editor = open_editor(config)?;
    editor.dispatch(Action::Edit(id))?;
    if json {
        let run = editor.form().read()?;
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print!("{}", editor.form());
    }
    Ok(())
}

fn handle_delete(config: &Config, id: usize, yes: bool) -> anyhow::Result<()> {
    let mut editor = open_editor(config)?;
    if !yes && config.shell.confirm_delete {
        let run = editor.log().get(id)?;
        println!(
            "This will delete run {id} ({}, {}).",
            run.date,
            run.distance_label()
        );
        println!("Use --yes to confirm.");
        return Ok(());
    }
    if let Outcome::Deleted { id, table } = editor.dispatch(Action::Delete(id))? {
        println!("Deleted run {id}.");
        print!("{table}");
    }
    Ok(())
}

fn handle_shell(config: &Config, yes: bool) -> anyhow::Result<()> {
    let mut editor = open_editor(config)?;
    let options = ShellOptions {
        confirm_delete: config.shell.confirm_delete && !yes,
    };
    shell::run(&mut editor, io::stdin().lock(), io::stdout().lock(), options)?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let editor = open_editor(config)?;
    let slots = editor.storage().store().keys()?;
    let run_count = editor.log().len();

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "slot_key": editor.storage().key(),
            "runs": run_count,
            "slots": slots,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("runlog status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Slot:          {}", editor.storage().key());
        println!("Runs:          {run_count}");
        println!("Slots:         {}", slots.join(", "));
    }
    Ok(())
}

fn handle_export(config: &Config) -> anyhow::Result<()> {
    let raw = open_storage(config)?.load_raw()?;
    println!("{}", raw.as_deref().unwrap_or("[]"));
    Ok(())
}

fn handle_reset(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("This will remove every stored run.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    if open_storage(config)?.clear()? {
        println!("All runs removed.");
    } else {
        println!("Nothing stored.");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Form]");
                println!("  Default units:      {}", config.form.default_units);
                println!("  Unit options:       {}", config.form.units.join(", "));
                println!();
                println!("[Shell]");
                println!("  Confirm delete:     {}", config.shell.confirm_delete);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(name: &str) -> Config {
        let path = std::env::temp_dir().join(format!(
            "runlog_main_{name}_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let mut config = Config::default();
        config.storage.database_path = Some(path);
        config
    }

    #[test]
    fn test_edit_without_fields_checks_id() {
        let config = create_test_config("edit_check");

        assert!(handle_edit(&config, 99, &RunFields::default()).is_err());

        let fields = RunFields {
            date: Some("2024-01-01".to_string()),
            distance: Some("5".to_string()),
            ..RunFields::default()
        };
        handle_add(&config, &fields).unwrap();
        assert!(handle_edit(&config, 0, &RunFields::default()).is_ok());

        let _ = std::fs::remove_file(config.database_path());
    }

    #[test]
    fn test_add_rejects_unlisted_units() {
        let config = create_test_config("units");
        let fields = RunFields {
            date: Some("2024-01-01".to_string()),
            units: Some("leagues".to_string()),
            ..RunFields::default()
        };

        assert!(handle_add(&config, &fields).is_err());
        assert!(open_editor(&config).unwrap().log().is_empty());

        let _ = std::fs::remove_file(config.database_path());
    }
}
