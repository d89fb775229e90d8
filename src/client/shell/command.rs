use super::route::Route;
use crate::client::controller::AttendanceForm;
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::NewEmployee;
use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use strum::IntoEnumIterator;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Go(Route),
    Refresh,
    Add(NewEmployee),
    Delete(String),
    Mark(AttendanceForm),
    Filter(Option<NaiveDate>),
    Quit,
}

/// One line typed at the console prompt.
#[derive(Debug, Parser)]
#[command(name = "hrms", no_binary_name = true)]
#[command(about = "HRMS Lite console commands")]
struct Line {
    #[command(subcommand)]
    verb: Verb,
}

#[derive(Debug, Subcommand)]
enum Verb {
    /// Open a page
    Go {
        /// dashboard, employees or attendance (or its path, e.g. /employees)
        #[arg(value_parser = parse_route)]
        page: Route,
    },
    /// Reload the current page
    Refresh,
    /// Add an employee (quote words: "Jane Doe")
    Add(Add),
    /// Delete an employee
    Delete {
        employee_id: String,
    },
    /// Mark attendance
    Mark(Mark),
    /// Filter attendance by date
    Filter {
        /// YYYY-MM-DD, or `clear`
        #[arg(value_parser = parse_filter)]
        day: DayFilter,
    },
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Args)]
struct Add {
    employee_id: String,
    full_name: String,
    email: String,
    department: String,
}

#[derive(Debug, Args)]
struct Mark {
    employee_id: String,

    /// YYYY-MM-DD, defaults to today
    #[arg(value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Present or Absent, defaults to Present
    #[arg(value_parser = parse_status)]
    status: Option<AttendanceStatus>,
}

#[derive(Clone, Copy, Debug)]
struct DayFilter(Option<NaiveDate>);

impl From<Verb> for Command {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Go { page } => Self::Go(page),
            Verb::Refresh => Self::Refresh,
            Verb::Add(add) => Self::Add(NewEmployee {
                employee_id: add.employee_id,
                full_name: add.full_name,
                email: add.email,
                department: add.department,
            }),
            Verb::Delete { employee_id } => Self::Delete(employee_id),
            Verb::Mark(mark) => {
                let defaults = AttendanceForm::default();
                Self::Mark(AttendanceForm {
                    employee_id: Some(mark.employee_id),
                    date: mark.date.unwrap_or(defaults.date),
                    status: mark.status.unwrap_or(defaults.status),
                })
            }
            Verb::Filter { day } => Self::Filter(day.0),
            Verb::Quit => Self::Quit,
        }
    }
}

/// Parse one input line. Blank lines are `Ok(None)`; `help` comes back as an
/// error of kind [`ErrorKind::DisplayHelp`] carrying the rendered help.
pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
    let words = tokenize(line).map_err(|msg| clap::Error::raw(ErrorKind::InvalidValue, format!("{msg}\n")))?;
    if words.is_empty() {
        return Ok(None);
    }

    let line = Line::try_parse_from(words)?;
    Ok(Some(line.verb.into()))
}

fn parse_route(raw: &str) -> Result<Route, String> {
    Route::resolve(raw).ok_or_else(|| "expected dashboard, employees or attendance".to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| "expected a date like 2024-01-31".to_string())
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    AttendanceStatus::iter()
        .find(|status| status.as_ref().eq_ignore_ascii_case(raw))
        .ok_or_else(|| "expected Present or Absent".to_string())
}

fn parse_filter(raw: &str) -> Result<DayFilter, String> {
    if raw.eq_ignore_ascii_case("clear") {
        return Ok(DayFilter(None));
    }
    parse_date(raw).map(|day| DayFilter(Some(day)))
}

/// Whitespace separated words; double quotes group words.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if pending {
        words.push(current);
    }
    Ok(words)
}
