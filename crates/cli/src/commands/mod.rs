use clap::{Parser, Subcommand};
use client::Client;

use crate::{config::GlobalArgs, error::Result};

mod auth;
mod budgets;
mod categories;
mod dashboard;
mod goals;
mod tags;
mod transactions;

#[derive(Parser, Debug)]
#[command(name = "finman")]
#[command(about = "Command-line front end for the personal finance backend")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in.
    Register(auth::RegisterArgs),
    /// Log in; the password is read from the terminal.
    Login(auth::LoginArgs),
    /// Revoke the refresh token and forget the local session.
    Logout,
    Profile(auth::Profile),
    /// Current month at a glance.
    Dashboard,
    #[command(alias = "tx")]
    Transactions(transactions::Transactions),
    Categories(categories::Categories),
    Tags(tags::Tags),
    Budgets(budgets::Budgets),
    Goals(goals::Goals),
}

impl Command {
    /// Commands that only make sense with stored credentials.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Self::Register(_) | Self::Login(_) | Self::Logout)
    }
}

pub async fn run(client: &Client, command: Command) -> Result<()> {
    match command {
        Command::Register(args) => auth::register(client, args).await,
        Command::Login(args) => auth::login(client, args).await,
        Command::Logout => auth::logout(client).await,
        Command::Profile(profile) => auth::profile(client, profile.command).await,
        Command::Dashboard => dashboard::run(client).await,
        Command::Transactions(tx) => transactions::run(client, tx.command).await,
        Command::Categories(cat) => categories::run(client, cat.command).await,
        Command::Tags(tags) => tags::run(client, tags.command).await,
        Command::Budgets(budgets) => budgets::run(client, budgets.command).await,
        Command::Goals(goals) => goals::run(client, goals.command).await,
    }
}
