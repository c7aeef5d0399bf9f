//! Account administration for the contacts server.
//!
//! Registers accounts, confirms their email, and issues bearer tokens
//! against the PostgreSQL store named by `--database-url` or
//! `CONTACTS_DATABASE_URL`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;

use contacts::domain::ports::AccountCommand;
use contacts::domain::{AccountService, EmailAddress, Username};
use contacts::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

const DATABASE_URL_VAR: &str = "CONTACTS_DATABASE_URL";

/// `contacts-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "contacts-admin",
    about = "Manage contacts server accounts and access tokens",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `CONTACTS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Register a new, unconfirmed account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Mark an account's email as confirmed.
    ConfirmEmail {
        #[arg(long)]
        email: String,
    },
    /// Issue a new bearer token, revoking the previous one.
    RotateToken {
        #[arg(long)]
        email: String,
    },
}

#[expect(
    clippy::print_stdout,
    reason = "the command report is the CLI's output"
)]
fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let report = runtime.block_on(run(args))?;
    println!("{report}");
    Ok(())
}

async fn run(args: CliArgs) -> Result<String> {
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_VAR).ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;
    let accounts = AccountService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    execute(&accounts, args.command).await
}

async fn execute(accounts: &dyn AccountCommand, command: Command) -> Result<String> {
    match command {
        Command::Register { username, email } => {
            let username = Username::new(username).wrap_err("invalid --username")?;
            let account = accounts.register(username, parse_email(&email)?).await?;
            Ok(format!("registered {} ({})", account.email, account.id))
        }
        Command::ConfirmEmail { email } => {
            let account = accounts.confirm_email(&parse_email(&email)?).await?;
            Ok(format!("confirmed {}", account.email))
        }
        Command::RotateToken { email } => {
            let token = accounts.rotate_token(&parse_email(&email)?).await?;
            Ok(token.expose().to_owned())
        }
    }
}

fn parse_email(raw: &str) -> Result<EmailAddress> {
    EmailAddress::new(raw).wrap_err("invalid --email")
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    let (value, source) = match (explicit, from_env) {
        (Some(value), _) => (value, "--database-url"),
        (None, Some(value)) => (value, DATABASE_URL_VAR),
        (None, None) => {
            return Err(eyre!(
                "database URL missing: set --database-url or {DATABASE_URL_VAR}"
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(eyre!("{source} must not be empty"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[rstest]
    fn rotate_token_parses_email() {
        let args = CliArgs::try_parse_from([
            "contacts-admin",
            "rotate-token",
            "--email",
            "ada@example.com",
        ])
        .expect("arguments parse");

        assert!(matches!(
            args.command,
            Command::RotateToken { ref email } if email == "ada@example.com"
        ));
        assert!(args.database_url.is_none());
    }

    #[rstest]
    #[case(Some("postgres://cli".to_owned()), Some("postgres://env".to_owned()), "postgres://cli")]
    #[case(None, Some("postgres://env".to_owned()), "postgres://env")]
    fn explicit_database_url_wins(
        #[case] explicit: Option<String>,
        #[case] from_env: Option<String>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            resolve_database_url(explicit, from_env).expect("url resolves"),
            expected
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   ".to_owned()), None)]
    #[case(None, Some(String::new()))]
    fn missing_or_blank_database_url_is_rejected(
        #[case] explicit: Option<String>,
        #[case] from_env: Option<String>,
    ) {
        assert!(resolve_database_url(explicit, from_env).is_err());
    }
}
