//! Interactive editing session.
//!
//! A line-oriented front end over [`Editor`]: the form stays filled between
//! commands, the same way it does on an open page. Anything that is not a
//! known command is treated as a row control id, so `tb_edit_2` works as
//! typed from the list.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::dispatch::{Editor, Outcome};
use crate::error::Result;
use crate::form::FormField;
use crate::render::{Action, ControlId};
use crate::storage::SlotStore;

const PROMPT: &str = "runlog> ";

const HELP: &str = "\
Commands:
  list                   show all runs
  form                   show the form
  set <field> <value>    fill a form field (date, units, id, distance, duration, comments)
  save                   store the form as a new run, or over the run it was loaded from
  new                    clear the form
  edit <n>               load run n into the form
  delete <n>             delete run n
  tb_edit_<n>, tb_del_<n>  press a row control from the list
  help                   show this help
  quit                   leave the session
";

/// Session options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    /// Ask `y/N` before deleting.
    pub confirm_delete: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            confirm_delete: true,
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Form,
    Set(FormField, String),
    Act(Action),
    Help,
    Quit,
    Blank,
}

/// Parse an input line. The error is the alert to show.
fn parse_line(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Blank,
        "list" | "ls" => Command::List,
        "form" | "show" => Command::Form,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "save" => Command::Act(Action::Save),
        "new" => Command::Act(Action::New),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = field.parse::<FormField>()?;
            Command::Set(field, value.trim().to_string())
        }
        "edit" => Command::Act(Action::Edit(parse_index(word, rest)?)),
        "delete" | "del" | "rm" => Command::Act(Action::Delete(parse_index(word, rest)?)),
        _ => Command::Act(
            line.parse::<ControlId>()
                .map_err(|e| format!("{e} (type 'help' for commands)"))?
                .action(),
        ),
    };
    Ok(command)
}

fn parse_index(word: &str, rest: &str) -> std::result::Result<usize, String> {
    rest.parse()
        .map_err(|_| format!("usage: {word} <n>, where n is a run id from the list"))
}

/// Run a session until `quit` or end of input.
///
/// Action failures are reported on `output` and the session carries on.
///
/// # Errors
///
/// Returns an error only if reading `input` or writing `output` fails.
pub fn run<S, R, W>(
    editor: &mut Editor<S>,
    mut input: R,
    mut output: W,
    options: ShellOptions,
) -> Result<()>
where
    S: SlotStore,
    R: BufRead,
    W: Write,
{
    write!(output, "{}", editor.table())?;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "alert: {e}")?;
                continue;
            }
        };
        debug!("Shell command {:?}", command);

        match command {
            Command::Blank => {}
            Command::Quit => break,
            Command::Help => write!(output, "{HELP}")?,
            Command::List => write!(output, "{}", editor.table())?,
            Command::Form => show_form(editor, &mut output)?,
            Command::Set(field, value) => editor.form_mut().set(field, value),
            Command::Act(action) => {
                if let Action::Delete(id) = action {
                    if options.confirm_delete && !confirm(&mut input, &mut output, id)? {
                        writeln!(output, "Kept run {id}.")?;
                        continue;
                    }
                }
                match editor.dispatch(action) {
                    Ok(outcome) => report(editor, &mut output, outcome)?,
                    Err(e) => writeln!(output, "error: {e}")?,
                }
            }
        }
    }

    Ok(())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, id: usize) -> Result<bool> {
    write!(output, "Delete run {id}? [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn show_form<S: SlotStore, W: Write>(editor: &Editor<S>, output: &mut W) -> Result<()> {
    write!(output, "{}", editor.form())?;
    let options = editor.unit_options();
    if !options.is_empty() {
        writeln!(output, "(units: {})", options.join(", "))?;
    }
    Ok(())
}

fn report<S: SlotStore, W: Write>(
    editor: &Editor<S>,
    output: &mut W,
    outcome: Outcome,
) -> Result<()> {
    match outcome {
        Outcome::Saved {
            id,
            appended,
            table,
        } => {
            let verb = if appended { "Added" } else { "Updated" };
            writeln!(output, "{verb} run {id}.")?;
            write!(output, "{table}")?;
        }
        Outcome::Cleared => writeln!(output, "Form cleared.")?,
        Outcome::Loaded { id } => {
            writeln!(output, "Editing run {id}.")?;
            show_form(editor, output)?;
        }
        Outcome::Deleted { id, table } => {
            writeln!(output, "Deleted run {id}.")?;
            write!(output, "{table}")?;
        }
    }
    Ok(())
}
