//! Line commands understood by the terminal front-end.

use crate::types::{EmployeeId, SeatId};
use std::str::FromStr;
use thiserror::Error;

/// Help text printed by `help`
pub const HELP: &str = "\
Commands:
  employees            list employees and their managers
  employee <ID>|none   act as an employee (or sign out)
  seat <ID>            select a seat, e.g. seat B1
  confirm              book the selected seat
  reset                clear the selection
  show                 redraw the seat map
  help                 show this help
  quit                 exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the directory
    Employees,
    /// Switch identity
    Employee(Option<EmployeeId>),
    /// Select a seat
    Seat(SeatId),
    /// Confirm the booking
    Confirm,
    /// Clear the selection
    Reset,
    /// Redraw
    Show,
    /// Print help
    Help,
    /// Exit
    Quit,
}

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line
    #[error("empty command")]
    Empty,
    /// First word not recognized
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    /// Command needs an argument
    #[error("'{command}' needs an argument: {expected}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// What was expected
        expected: &'static str,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let arg = words.next();

        match head.to_ascii_lowercase().as_str() {
            "employees" | "list" => Ok(Self::Employees),
            "employee" | "emp" => match arg {
                None => Err(CommandError::MissingArgument {
                    command: "employee",
                    expected: "an employee id or 'none'",
                }),
                Some(id) if id.eq_ignore_ascii_case("none") => Ok(Self::Employee(None)),
                Some(id) => Ok(Self::Employee(Some(EmployeeId::new(id.to_ascii_uppercase())))),
            },
            "seat" | "select" => arg
                .map(|id| Self::Seat(SeatId::new(id.to_ascii_uppercase())))
                .ok_or(CommandError::MissingArgument {
                    command: "seat",
                    expected: "a seat id",
                }),
            "confirm" | "book" => Ok(Self::Confirm),
            "reset" | "clear" => Ok(Self::Reset),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Interprets a confirmation answer; anything but yes is no
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
