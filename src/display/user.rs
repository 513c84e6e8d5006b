//! User and audit trail display formatting
//!
//! Formats users and audit entries for terminal output in table and detail
//! views.

use std::fmt::Write;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::AuditLogEntry;
use crate::models::User;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Forename")]
    forename: String,
    #[tabled(rename = "Surname")]
    surname: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Date of Birth")]
    date_of_birth: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Log")]
    id: i64,
    #[tabled(rename = "User")]
    user_id: i64,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "When (UTC)")]
    timestamp: String,
    #[tabled(rename = "Changes")]
    changes: String,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

// An unusable pattern falls back to ISO dates instead of panicking
fn format_date(date: NaiveDate, date_format: &str) -> String {
    let mut output = String::new();
    match write!(output, "{}", date.format(date_format)) {
        Ok(()) => output,
        Err(_) => date.to_string(),
    }
}

/// Format a list of users as a table
pub fn format_user_list(users: &[User], date_format: &str) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let rows = users.iter().map(|user| UserRow {
        id: user.id.value(),
        forename: user.forename.clone(),
        surname: user.surname.clone(),
        email: user.email.clone(),
        date_of_birth: format_date(user.date_of_birth, date_format),
        active: yes_no(user.is_active),
    });

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push_str(&format!("\n\nTotal: {} users", users.len()));
    output
}

/// Format a single user in detail view
pub fn format_user_details(user: &User, date_format: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("User: {}\n", user.full_name()));
    output.push_str(&format!("  ID:            {}\n", user.id));
    output.push_str(&format!("  Email:         {}\n", user.email));
    output.push_str(&format!(
        "  Date of Birth: {}\n",
        format_date(user.date_of_birth, date_format)
    ));
    output.push_str(&format!("  Active:        {}\n", yes_no(user.is_active)));
    output
}

/// Format audit entries as a table, with a change summary for updates
pub fn format_log_list(logs: &[AuditLogEntry]) -> String {
    if logs.is_empty() {
        return "No audit entries found.".to_string();
    }

    let rows = logs.iter().map(|log| LogRow {
        id: log.id.value(),
        user_id: log.user_id.value(),
        action: log.action.to_string(),
        timestamp: log.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        changes: log.diff_summary().unwrap_or_default(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}
