//! `superlists` command-line entry point.
//!
//! Drives the core forms against a SQLite file so list creation, item
//! appends, and sharing can be exercised without a web front end.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use superlists_core::db::open_db;
use superlists_core::{
    default_log_level, init_logging, Caller, ExistingListItemForm, FormData, FormError, ListId,
    ListRepository, NewListForm, ShareWithForm, SqliteListRepository, SqliteUserRepository,
    UserRepository,
};

#[derive(Parser, Debug)]
#[command(name = "superlists", version, about = "Manage to-do lists from the terminal")]
struct Cli {
    /// SQLite database file, created and migrated on first use
    #[arg(long, env = "SUPERLISTS_DB", default_value = "superlists.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "SUPERLISTS_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "SUPERLISTS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a user account
    Register { email: String },
    /// Start a new list with its first item
    New {
        text: String,
        /// Create the list as this registered user
        #[arg(long)]
        owner: Option<String>,
    },
    /// Append an item to an existing list
    Add { list_id: ListId, text: String },
    /// Share a list with another registered user
    Share { list_id: ListId, email: String },
    /// Print a list with its items, owner, and sharees
    Show { list_id: ListId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<FormError>() {
                Some(FormError::Invalid(errors)) => match serde_json::to_string(errors) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("{errors}"),
                },
                _ => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    let lists = SqliteListRepository::try_new(&conn)?;
    let users = SqliteUserRepository::try_new(&conn)?;

    match cli.command {
        Command::Register { email } => {
            let user = users.create_user(&email)?;
            info!("event=user_register module=cli status=ok user_id={}", user.id);
            println!("{}", user.id);
        }
        Command::New { text, owner } => {
            let caller = match owner {
                Some(email) => Caller::Authenticated(
                    users
                        .get_user_by_email(&email)?
                        .ok_or_else(|| anyhow!("no registered user with that email"))?,
                ),
                None => Caller::Anonymous,
            };
            let list = NewListForm::bound(FormData::new().with("text", text))
                .save(&lists, &caller)?;
            println!("{}", list.absolute_url());
        }
        Command::Add { list_id, text } => {
            let list = lists
                .get_list(list_id)?
                .ok_or_else(|| anyhow!("list not found: {list_id}"))?;
            let item = ExistingListItemForm::bound(&list, FormData::new().with("text", text))
                .save(&lists)?;
            println!("{}", item.id);
        }
        Command::Share { list_id, email } => {
            let list = lists
                .get_list(list_id)?
                .ok_or_else(|| anyhow!("list not found: {list_id}"))?;
            let list = ShareWithForm::bound(&list, FormData::new().with("sharee", email))
                .save(&users, &lists)?;
            println!("{}", list.absolute_url());
        }
        Command::Show { list_id } => {
            let list = lists
                .get_list(list_id)?
                .ok_or_else(|| anyhow!("list not found: {list_id}"))?;
            let owner = match list.owner {
                Some(owner_id) => users.get_user(owner_id)?.map(|user| user.email),
                None => None,
            };
            let name = lists.list_name(list.id)?;
            println!("list {} {}", list.absolute_url(), name.as_deref().unwrap_or("(empty)"));
            println!("owner {}", owner.as_deref().unwrap_or("-"));
            for (index, item) in lists.list_items(list.id)?.iter().enumerate() {
                println!("{}: {}", index + 1, item.text);
            }
            for sharee in lists.shared_with(list.id)? {
                println!("shared with {}", sharee.email);
            }
        }
    }

    Ok(())
}
