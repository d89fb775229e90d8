use super::route::Route;
use crate::client::controller::{AttendanceLine, ViewState};
use crate::model::dashboard::DashboardSummary;
use crate::model::employee::Employee;
use chrono::{Datelike, Local, NaiveDate};
use std::fmt::Write;
use strum::IntoEnumIterator;

/// Plain text table, columns padded to their widest cell.
pub fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = pad_row(header.iter().copied(), &widths);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        out.push('\n');
        out.push_str(&pad_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

pub fn navbar(active: Route) -> String {
    let links: Vec<String> = Route::iter()
        .map(|route| {
            if route == active {
                format!("[{route}]")
            } else {
                route.to_string()
            }
        })
        .collect();
    format!("HRMS Lite  {}", links.join("  "))
}

pub fn footer() -> String {
    format!("\u{a9} {} HRMS Lite", Local::now().year())
}

pub fn dashboard(state: &ViewState, summary: Option<DashboardSummary>) -> String {
    match (state, summary) {
        (ViewState::Loading, _) => "Loading Dashboard...".to_string(),
        (ViewState::Failed(message), _) => message.clone(),
        (ViewState::Ready, summary) => {
            let summary = summary.unwrap_or_default();
            format!(
                "{}\n\nTotal Employees: {}\nPresent Today:   {}\n\n\
                 Welcome to HRMS Lite\n\
                 Use `go employees` and `go attendance` to manage employees and track attendance.",
                Route::Dashboard.title(),
                summary.total_employees,
                summary.present_today
            )
        }
    }
}

pub fn employees(state: &ViewState, employees: &[Employee]) -> String {
    match state {
        ViewState::Loading => return "Loading...".to_string(),
        ViewState::Failed(message) => return message.clone(),
        ViewState::Ready => {}
    }

    let mut out = format!(
        "{}\n\nAdd New Employee: add <id> <full name> <email> <department>\n\nEmployee List\n",
        Route::Employees.title()
    );

    if employees.is_empty() {
        out.push_str("No employees found.");
        return out;
    }

    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|e| {
            vec![
                e.employee_id.clone(),
                e.full_name.clone(),
                e.email.clone(),
                e.department.clone(),
                format!("{} days", e.total_present),
            ]
        })
        .collect();
    out.push_str(&table(
        &["ID", "Name", "Email", "Department", "Total Present"],
        &rows,
    ));
    out
}

pub fn attendance(
    state: &ViewState,
    filter: Option<NaiveDate>,
    employees: &[Employee],
    lines: &[AttendanceLine],
) -> String {
    match state {
        ViewState::Loading => return "Loading...".to_string(),
        // the previous log stays on screen below the message
        ViewState::Failed(_) | ViewState::Ready => {}
    }

    let mut out = format!(
        "{}\n\nMark Attendance: mark <id> [YYYY-MM-DD] [Present|Absent]\n",
        Route::Attendance.title()
    );
    if let ViewState::Failed(message) = state {
        let _ = writeln!(out, "{message}");
    }

    let options: Vec<String> = employees
        .iter()
        .map(|e| format!("{} ({})", e.full_name, e.employee_id))
        .collect();
    if options.is_empty() {
        out.push_str("Employees: none\n");
    } else {
        let _ = writeln!(out, "Employees: {}", options.join(", "));
    }

    let _ = writeln!(
        out,
        "\nAttendance Records  (filter: {})",
        filter.map_or_else(|| "all dates".to_string(), |d| d.to_string())
    );

    if lines.is_empty() {
        out.push_str("No attendance records found.");
        return out;
    }

    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            vec![
                line.date.to_string(),
                line.employee_name.clone(),
                line.status.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&["Date", "Employee Name", "Status"], &rows));
    out
}
