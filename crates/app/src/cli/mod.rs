use clap::{Parser, Subcommand};

mod db;
mod receipt;
mod timesheet;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "fieldwork-app", about = "Fieldwork back office CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Db(db::DbCommand),
    /// Print worked time per technician
    Timesheet(timesheet::TimesheetArgs),
    /// Print a job's receipt
    Receipt(receipt::ReceiptArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
            Commands::Timesheet(args) => timesheet::run(args).await,
            Commands::Receipt(args) => receipt::run(args).await,
        }
    }
}
