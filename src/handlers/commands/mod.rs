//! Command handlers module
//!
//! This module parses `eventhub <command>` arguments and dispatches them.

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod help;

use uuid::Uuid;

use crate::derivation::StatusFilter;
use crate::models::{EventStatus, Role};
use crate::state::AppState;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::parse_form_datetime;

/// All available commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Events { filter: StatusFilter, query: String },
    Event { id: Uuid },
    Login { email: String, password: String, role: Role },
    Signup { name: String, email: String, password: String, role: Role },
    Logout,
    Register { event_id: Uuid },
    Create(CreateArgs),
    Dashboard,
}

/// Raw input of the event creation form
#[derive(Debug, Clone, PartialEq)]
pub struct CreateArgs {
    pub title: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub location: String,
    /// `None` falls back to the configured default capacity
    pub capacity: Option<i32>,
    pub description: String,
    pub image: Option<String>,
}

impl Command {
    /// Parse arguments following the program name
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        match name.as_str() {
            "help" | "--help" | "-h" => Ok(Command::Help),
            "events" => {
                let (filter, query) = match rest.split_first() {
                    Some((first, tail)) => match parse_filter(first) {
                        Some(filter) => (filter, tail.join(" ")),
                        None => (StatusFilter::All, rest.join(" ")),
                    },
                    None => (StatusFilter::All, String::new()),
                };
                Ok(Command::Events { filter, query })
            }
            "event" => {
                let [id] = expect_args::<1>(name, rest)?;
                Ok(Command::Event { id: parse_id(&id)? })
            }
            "login" => {
                let [email, password, role] = expect_args::<3>(name, rest)?;
                Ok(Command::Login { email, password, role: parse_role(&role)? })
            }
            "signup" => {
                let [name_arg, email, password, role] = expect_args::<4>(name, rest)?;
                Ok(Command::Signup { name: name_arg, email, password, role: parse_role(&role)? })
            }
            "logout" => Ok(Command::Logout),
            "register" => {
                let [id] = expect_args::<1>(name, rest)?;
                Ok(Command::Register { event_id: parse_id(&id)? })
            }
            "create" => parse_create(rest),
            "dashboard" => Ok(Command::Dashboard),
            other => Err(EventHubError::InvalidInput(format!("Unknown command: {}", other))),
        }
    }
}

/// Main command dispatcher
pub async fn execute(command: Command, app: &AppState) -> Result<String> {
    match command {
        Command::Help => Ok(help::help_text()),
        Command::Events { filter, query } => Ok(events::list_events(app, filter, &query)),
        Command::Event { id } => events::show_event(app, id).await,
        Command::Login { email, password, role } => auth::login(app, &email, &password, role).await,
        Command::Signup { name, email, password, role } => {
            auth::signup(app, &name, &email, &password, role).await
        }
        Command::Logout => auth::logout(app).await,
        Command::Register { event_id } => events::register(app, event_id).await,
        Command::Create(args) => events::create(app, args).await,
        Command::Dashboard => Ok(dashboard::dashboard(app)),
    }
}

fn parse_filter(value: &str) -> Option<StatusFilter> {
    if value.eq_ignore_ascii_case("all") {
        return Some(StatusFilter::All);
    }
    value.parse::<EventStatus>().ok().map(StatusFilter::Only)
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| EventHubError::InvalidInput(format!("Invalid event id: {}", value)))
}

fn parse_role(value: &str) -> Result<Role> {
    value.parse::<Role>().map_err(EventHubError::InvalidInput)
}

fn expect_args<const N: usize>(command: &str, rest: &[String]) -> Result<[String; N]> {
    <[String; N]>::try_from(rest.to_vec()).map_err(|_| {
        EventHubError::InvalidInput(format!(
            "'{}' takes {} argument(s), got {}",
            command,
            N,
            rest.len()
        ))
    })
}

fn parse_create(rest: &[String]) -> Result<Command> {
    if rest.len() != 6 && rest.len() != 7 {
        return Err(EventHubError::InvalidInput(format!(
            "'create' takes 6 or 7 arguments, got {}",
            rest.len()
        )));
    }

    let capacity = match rest[4].trim() {
        "-" | "default" => None,
        value => Some(value.parse::<i32>().map_err(|_| {
            EventHubError::InvalidInput(format!("Invalid capacity: {}", rest[4]))
        })?),
    };

    Ok(Command::Create(CreateArgs {
        title: rest[0].clone(),
        date: parse_form_datetime(&rest[1], &rest[2])?,
        location: rest[3].clone(),
        capacity,
        description: rest[5].clone(),
        image: rest.get(6).cloned(),
    }))
}
