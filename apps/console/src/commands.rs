//! Operator input parsed into shell commands.

use client_core::{form::UnknownField, session::UnknownAction, Action, FormField};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Set { field: FormField, value: String },
    Show,
    Html,
    Wait,
    Help,
    Quit,
    Run(Action),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: set <field> <value>")]
    MissingField,
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error("{0}; type 'help' for the command list")]
    UnknownCommand(#[from] UnknownAction),
}

pub const HELP: &str = "\
commands:
  set <field> <value>   edit a form field (id, name, description, type, value, percent, status, expiry)
  show                  print the form
  create | update | retrieve | delete | search | activate | deactivate | health
                        send a request built from the form
  clear                 clear the form, id and flash message
  html                  print the search_results markup
  wait                  hold input until in-flight requests complete
  help                  print this list
  quit                  exit";

/// Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim_start()));

    let command = match word.to_ascii_lowercase().as_str() {
        "set" => {
            if rest.is_empty() {
                return Err(CommandError::MissingField);
            }
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(field, value)| (field, value.trim()));
            ShellCommand::Set {
                field: field.parse()?,
                value: value.to_string(),
            }
        }
        "show" => ShellCommand::Show,
        "html" => ShellCommand::Html,
        "wait" => ShellCommand::Wait,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Run(other.parse()?),
    };
    Ok(Some(command))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
