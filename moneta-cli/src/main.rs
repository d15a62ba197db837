use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use moneta_client::{ApiClient, FileTokenStore, FilterRequest, SessionStore};
use moneta_core::TransactionKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod account;
mod categories;
mod config;
mod dashboard;
mod export;
mod filter;
mod records;
mod state;

#[derive(Parser, Debug)]
#[command(name = "moneta", version, about = "Terminal client for the Money Manager API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login,

    /// Create a new account
    Register,

    /// Clear the stored session token
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Income records
    Income {
        #[command(subcommand)]
        command: RecordCommand,
    },

    /// Expense records
    Expense {
        #[command(subcommand)]
        command: RecordCommand,
    },

    /// Transaction categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Totals and recent activity
    Dashboard,

    /// Category breakdown and recent trend for one record kind
    Overview {
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Search transaction history
    Filter {
        #[arg(long, value_enum, default_value = "income")]
        kind: KindArg,

        /// Earliest date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Latest date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Substring to match against record names
        #[arg(long, default_value = "")]
        keyword: String,

        #[arg(long, default_value = "date")]
        sort_by: String,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Spreadsheet export
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RecordCommand {
    /// List records alongside the matching category count
    List,

    /// Add a record
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        amount: f64,

        /// Date (YYYY-MM-DD; defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Category id (see: moneta category list)
        #[arg(long)]
        category: i64,

        /// Display glyph, e.g. an emoji
        #[arg(long)]
        icon: Option<String>,
    },

    /// Replace a record
    Update {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        category: i64,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a record
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List categories, optionally only one type
    List {
        #[arg(value_enum)]
        kind: Option<KindArg>,
    },

    /// Add a category
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Rename or retype a category
    Update {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a category
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// Download the spreadsheet to a file
    Download {
        #[arg(value_enum)]
        kind: KindArg,

        #[arg(long)]
        out: PathBuf,
    },

    /// Have the server email the spreadsheet
    Email {
        #[arg(value_enum)]
        kind: KindArg,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let tokens = Arc::new(FileTokenStore::new(state::auth_path()?));
    let sessions = Arc::new(SessionStore::new(tokens));
    sessions.on_invalidated(|| {
        eprintln!("Session expired. Run `moneta login` to sign in again.");
    });
    let client = ApiClient::new(cfg.api.base_url.clone(), sessions);

    if let Err(err) = run(cli.command, &client).await {
        // Print the connectivity message once instead of letting the raw
        // error chain repeat it.
        if let Some(message) = connectivity_message(&err) {
            eprintln!("{message}");
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

/// The dedicated message for failures where no response came back at all.
fn connectivity_message(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<moneta_client::ApiError>() {
        Some(api) if api.is_connectivity() => {
            Some("Network error. Please check your internet connection.")
        }
        _ => None,
    }
}

async fn run(command: Command, client: &ApiClient) -> Result<()> {
    match command {
        Command::Login => account::log_in(client).await?,
        Command::Register => account::register(client).await?,
        Command::Logout => account::log_out(client),
        Command::Whoami => account::whoami(client).await?,

        Command::Income { command } => {
            run_record(client, TransactionKind::Income, command).await?
        }
        Command::Expense { command } => {
            run_record(client, TransactionKind::Expense, command).await?
        }

        Command::Category { command } => match command {
            CategoryCommand::List { kind } => {
                categories::list(client, kind.map(Into::into)).await?
            }
            CategoryCommand::Add { name, kind, icon } => {
                categories::add(client, name, kind.into(), icon).await?
            }
            CategoryCommand::Update {
                id,
                name,
                kind,
                icon,
            } => categories::update(client, id, name, kind.into(), icon).await?,
            CategoryCommand::Delete { id } => categories::delete(client, id).await?,
        },

        Command::Dashboard => dashboard::show(client).await?,
        Command::Overview { kind } => dashboard::overview(client, kind.into()).await?,

        Command::Filter {
            kind,
            start,
            end,
            keyword,
            sort_by,
            order,
        } => {
            filter::run(
                client,
                FilterRequest {
                    kind: kind.into(),
                    start_date: start,
                    end_date: end,
                    keyword,
                    sort_by,
                    sort_order: order,
                },
            )
            .await?
        }

        Command::Export { command } => match command {
            ExportCommand::Download { kind, out } => {
                export::download(client, kind.into(), &out).await?
            }
            ExportCommand::Email { kind } => export::email(client, kind.into()).await?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

async fn run_record(
    client: &ApiClient,
    kind: TransactionKind,
    command: RecordCommand,
) -> Result<()> {
    match command {
        RecordCommand::List => records::list(client, kind).await,
        RecordCommand::Add {
            name,
            amount,
            date,
            category,
            icon,
        } => records::add(client, kind, name, amount, date, category, icon).await,
        RecordCommand::Update {
            id,
            name,
            amount,
            date,
            category,
            icon,
        } => records::update(client, kind, id, name, amount, date, category, icon).await,
        RecordCommand::Delete { id } => records::delete(client, kind, id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_client::ApiError;

    #[tokio::test]
    async fn test_connectivity_failures_get_the_dedicated_message() {
        let transport_err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();

        let network = anyhow::Error::new(ApiError::Network(transport_err));
        assert_eq!(
            connectivity_message(&network),
            Some("Network error. Please check your internet connection.")
        );

        // Auth and server failures keep their own reporting.
        let unauthorized = anyhow::Error::new(ApiError::Unauthorized);
        assert_eq!(connectivity_message(&unauthorized), None);
    }
}
