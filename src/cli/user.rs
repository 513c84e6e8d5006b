//! User CLI commands
//!
//! Implements the list, view, add, edit and delete flows plus audit trail
//! retrieval.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_log_list, format_user_details, format_user_list};
use crate::error::{UserMgmtError, UserMgmtResult};
use crate::models::{User, UserId};
use crate::services::UserService;
use crate::storage::Repository;

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    List {
        /// Only active users
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive users
        #[arg(long)]
        inactive: bool,
    },
    /// Show a user and its audit trail
    Show {
        /// User ID (e.g. 3 or usr-3)
        id: UserId,
    },
    /// Add a new (inactive) user
    Add {
        #[arg(long)]
        forename: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        dob: NaiveDate,
    },
    /// Edit an existing user
    Edit {
        /// User ID
        id: UserId,
        #[arg(long)]
        forename: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        dob: Option<NaiveDate>,
        /// Set the active flag
        #[arg(long, value_name = "BOOL")]
        active: Option<bool>,
    },
    /// Delete a user (its audit trail is kept)
    Delete {
        /// User ID
        id: UserId,
    },
    /// Show audit entries for one user, or the most recent overall
    Logs {
        /// User ID; may refer to a deleted user
        id: Option<UserId>,
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Handle a user command
pub fn handle_user_command(
    repo: &Repository,
    settings: &Settings,
    cmd: UserCommands,
) -> UserMgmtResult<()> {
    let service = UserService::new(repo);

    match cmd {
        UserCommands::List { active, inactive } => {
            let users = match (active, inactive) {
                (true, _) => service.filter_by_active(true),
                (_, true) => service.filter_by_active(false),
                _ => service.get_all_users(),
            };
            println!("{}", format_user_list(&users, &settings.date_format));
        }

        UserCommands::Show { id } => {
            let user = service.get_user_by_id(id)?;
            println!("{}", format_user_details(&user, &settings.date_format));
            println!("Audit trail:");
            println!("{}", format_log_list(&service.get_logs_by_user_id(id)));
        }

        UserCommands::Add {
            forename,
            surname,
            email,
            dob,
        } => {
            let mut user = User::new(forename.trim(), surname.trim(), email.trim(), dob);
            validate(&user)?;

            if !service.add_user(&mut user) {
                return Err(UserMgmtError::Storage(format!(
                    "Could not create user '{}'",
                    user.full_name()
                )));
            }
            println!("Created user: {} ({})", user.full_name(), user.id);
        }

        UserCommands::Edit {
            id,
            forename,
            surname,
            email,
            dob,
            active,
        } => {
            let mut user = service.get_user_by_id(id)?;
            if let Some(forename) = forename {
                user.forename = forename.trim().to_string();
            }
            if let Some(surname) = surname {
                user.surname = surname.trim().to_string();
            }
            if let Some(email) = email {
                user.email = email.trim().to_string();
            }
            if let Some(dob) = dob {
                user.date_of_birth = dob;
            }
            if let Some(active) = active {
                user.is_active = active;
            }
            validate(&user)?;

            if !service.update(&user) {
                return Err(UserMgmtError::Storage(format!(
                    "Could not update user {}",
                    id
                )));
            }
            println!("Updated user: {} ({})", user.full_name(), user.id);
        }

        UserCommands::Delete { id } => {
            let user = service.get_user_by_id(id)?;
            if !service.delete_user_by_id(id)? {
                return Err(UserMgmtError::Storage(format!(
                    "Could not delete user {}",
                    id
                )));
            }
            println!("Deleted user: {} ({})", user.full_name(), id);
        }

        UserCommands::Logs { id, limit } => {
            let logs = match id {
                Some(id) => {
                    let mut logs = service.get_logs_by_user_id(id);
                    if let Some(limit) = limit {
                        let start = logs.len().saturating_sub(limit);
                        logs.drain(..start);
                    }
                    logs
                }
                None => service.recent_logs(limit.unwrap_or(settings.recent_log_count)),
            };
            println!("{}", format_log_list(&logs));
        }
    }

    Ok(())
}

fn validate(user: &User) -> UserMgmtResult<()> {
    user.validate().map_err(|e| UserMgmtError::Validation(e.to_string()))
}
