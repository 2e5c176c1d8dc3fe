//! Command-line entry point over `photostaff_core`.
//!
//! # Responsibility
//! - Map subcommands onto core services and print JSON results.
//! - Keep parsing thin: every rule lives in core.
//!
//! Settings come from `PHOTOSTAFF_DB_PATH`, `PHOTOSTAFF_LOG_LEVEL` and
//! `PHOTOSTAFF_LOG_DIR`.

use chrono::NaiveDate;
use log::debug;
use photostaff_core::db::{open_db, Connection};
use photostaff_core::{
    init_logging, AssignmentService, CoreConfig, EventListQuery, EventService, NewEvent,
    PhotographerService, SqliteAssignmentRepository, SqliteEventRepository,
    SqlitePhotographerRepository,
};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;
use uuid::Uuid;

const USAGE: &str = "usage: photostaff <command> [args]

commands:
  ping
  version
  add-event <name> <YYYY-MM-DD> <photographers-required>
  add-photographer <name> <email> <phone>
  activate <photographer-id>
  deactivate <photographer-id>
  events
  photographers
  event <event-id>
  assign <event-id>
  schedule <photographer-id>
  assignments [event-id]";

#[derive(Debug)]
enum CliError {
    Usage(String),
    InvalidArgument { name: &'static str, value: String },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}\n\n{USAGE}"),
            Self::InvalidArgument { name, value } => write!(f, "invalid {name}: `{value}`"),
        }
    }
}

impl Error for CliError {}

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> CliResult<String> {
    let Some((command, rest)) = args.split_first() else {
        return Err(CliError::Usage("missing command".to_string()).into());
    };

    match command.as_str() {
        "ping" => return Ok(photostaff_core::ping().to_string()),
        "version" => return Ok(photostaff_core::core_version().to_string()),
        "help" | "--help" | "-h" => return Ok(USAGE.to_string()),
        _ => {}
    }

    let config = CoreConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;
    debug!("event=cli_command module=cli status=start command={command}");
    let conn = open_db(&config.db_path)?;

    let output = dispatch(&conn, command, rest)?;
    Ok(serde_json::to_string_pretty(&output)?)
}

fn dispatch(conn: &Connection, command: &str, args: &[String]) -> CliResult<Value> {
    let events = EventService::new(SqliteEventRepository::new(conn));
    let photographers = PhotographerService::new(SqlitePhotographerRepository::new(conn));
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(conn));

    let value = match (command, args) {
        ("add-event", [name, date, required]) => {
            let request = NewEvent {
                name: name.clone(),
                event_date: parse_date(date)?,
                photographers_required: required.parse().map_err(|_| {
                    CliError::InvalidArgument {
                        name: "photographers-required",
                        value: required.clone(),
                    }
                })?,
            };
            serde_json::to_value(events.create_event(&request)?)?
        }
        ("add-photographer", [name, email, phone]) => serde_json::to_value(
            photographers.register_photographer(name.as_str(), email.as_str(), phone.as_str())?,
        )?,
        ("activate", [id]) => {
            photographers.set_active(parse_id("photographer-id", id)?, true)?;
            Value::Null
        }
        ("deactivate", [id]) => {
            photographers.set_active(parse_id("photographer-id", id)?, false)?;
            Value::Null
        }
        ("events", []) => serde_json::to_value(events.list_events(&EventListQuery::default())?)?,
        ("photographers", []) => serde_json::to_value(photographers.list_photographers(true)?)?,
        ("event", [id]) => serde_json::to_value(events.event_detail(parse_id("event-id", id)?)?)?,
        ("assign", [id]) => serde_json::to_value(engine.assign(parse_id("event-id", id)?)?)?,
        ("schedule", [id]) => {
            serde_json::to_value(engine.schedule(parse_id("photographer-id", id)?)?)?
        }
        ("assignments", []) => serde_json::to_value(engine.list_assignments(None)?)?,
        ("assignments", [id]) => {
            serde_json::to_value(engine.list_assignments(Some(parse_id("event-id", id)?))?)?
        }
        (other, _) => {
            return Err(CliError::Usage(format!(
                "unknown command or wrong arguments: `{other}`"
            ))
            .into())
        }
    };
    Ok(value)
}

fn parse_id(name: &'static str, value: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value.trim()).map_err(|_| CliError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| CliError::InvalidArgument {
        name: "date",
        value: value.to_string(),
    })
}
